use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const POWER_PREF_ENV: &str = "POSEKIT_POWER_PREF";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerPreference {
    #[default]
    Low,
    Default,
    High,
}

impl PowerPreference {
    /// Accepts the spellings used by the environment override. Unknown values
    /// select low power.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" | "high_performance" | "high-performance" => Self::High,
            "default" => Self::Default,
            _ => Self::Low,
        }
    }
}

/// Shell settings, read from a JSON file. Missing fields keep their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub window_width: f32,
    pub window_height: f32,
    pub status_timeout_ms: u64,
    pub power_preference: PowerPreference,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            window_width: 1200.0,
            window_height: 800.0,
            status_timeout_ms: 5000,
            power_preference: PowerPreference::default(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid viewer config")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "viewer config loaded");
        Ok(config)
    }

    /// Loads `path` when given, otherwise defaults, then applies the
    /// environment override.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        if let Ok(value) = std::env::var(POWER_PREF_ENV) {
            config.apply_power_override(&value);
        }
        Ok(config)
    }

    pub fn apply_power_override(&mut self, value: &str) {
        self.power_preference = PowerPreference::parse(value);
    }
}
