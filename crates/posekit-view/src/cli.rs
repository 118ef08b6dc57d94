use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "posekit-view")]
#[command(about = "Pose annotation viewer: align a 3D model against a reference image")]
pub struct CliArgs {
    #[command(subcommand)]
    pub mode: Option<Mode>,
    /// Background image to load at startup.
    #[arg(long)]
    pub image: Option<PathBuf>,
    /// OBJ model to load at startup.
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// JSON viewer settings.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Mode {
    Headless {
        #[command(subcommand)]
        command: HeadlessCommand,
    },
}

#[derive(Subcommand)]
pub enum HeadlessCommand {
    /// Render one frame through the command recorder and print it.
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    #[arg(long)]
    pub image: Option<PathBuf>,
    #[arg(long)]
    pub model: Option<PathBuf>,
    /// Degrees about X, Y and Z, e.g. 0,45,0
    #[arg(long, default_value = "0,0,0")]
    pub rotation: String,
    #[arg(long, default_value = "0,0,0")]
    pub translation: String,
    #[arg(long, default_value_t = 1.0)]
    pub scale: f32,
    #[arg(long, default_value_t = 1200)]
    pub width: u32,
    #[arg(long, default_value_t = 800)]
    pub height: u32,
}
