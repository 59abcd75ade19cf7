// Configuration loading

pub mod settings;

pub use settings::Settings;

use std::path::PathBuf;

/// Directory holding settings and the default session file.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tabstep")
}
