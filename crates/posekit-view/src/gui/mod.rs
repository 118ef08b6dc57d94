mod app;
mod status;

pub use app::{Preload, run_gui};
