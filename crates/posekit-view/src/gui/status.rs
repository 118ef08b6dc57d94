use std::time::{Duration, Instant};

use posekit_view::viewer::TransformState;

/// Transient status-bar message that disappears after a timeout.
pub struct StatusLine {
    timeout: Duration,
    message: Option<(String, Instant)>,
}

impl StatusLine {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            message: None,
        }
    }

    pub fn show(&mut self, text: impl Into<String>) {
        self.message = Some((text.into(), Instant::now() + self.timeout));
    }

    /// Current message, dropping it once expired.
    pub fn current(&mut self, now: Instant) -> Option<&str> {
        if self
            .message
            .as_ref()
            .is_some_and(|(_, deadline)| *deadline <= now)
        {
            self.message = None;
        }
        self.message.as_ref().map(|(text, _)| text.as_str())
    }

    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.message
            .as_ref()
            .map(|(_, deadline)| deadline.saturating_duration_since(now))
    }
}

pub fn format_pose(pose: &TransformState) -> String {
    let r = pose.rotation;
    let t = pose.translation;
    format!(
        "Rotation ({:.1}, {:.1}, {:.1})  Translation ({:.2}, {:.2}, {:.2})  Scale {:.3}",
        r.x, r.y, r.z, t.x, t.y, t.z, pose.scale
    )
}
