// Application settings
// Loaded from ~/.config/tabstep/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_FILE: &str = r#"{
    // Starter tableau: labels for a fresh session (and for reset)
    "tableau.columns": ["x1", "x2", "b"],
    "tableau.rows": ["z", "c1", "c2"],

    // History gallery order
    "history.newestFirst": true,

    // Session file (null = session.json next to this file)
    "session.file": null
}
"#;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Tableau
    #[serde(rename = "tableau.columns")]
    pub columns: Vec<String>,

    #[serde(rename = "tableau.rows")]
    pub rows: Vec<String>,

    // History
    #[serde(rename = "history.newestFirst")]
    pub newest_first: bool,

    // Session
    #[serde(rename = "session.file")]
    pub session_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: vec!["x1".into(), "x2".into(), "b".into()],
            rows: vec!["z".into(), "c1".into(), "c2".into()],
            newest_first: true,
            session_file: None,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        crate::config_dir().join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file(&path);
            return settings;
        }

        Self::load_from(&path)
    }

    /// Load settings from a specific file. Never fails: unreadable or
    /// malformed files give the defaults.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    log::warn!("Error parsing {}: {}; using default settings", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn from_json_str(contents: &str) -> Result<Self, serde_json::Error> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        let mut settings: Self = serde_json::from_str(&cleaned)?;
        settings.repair();
        Ok(settings)
    }

    /// A starter grid needs at least one column and one row.
    fn repair(&mut self) {
        let defaults = Self::default();
        if self.columns.is_empty() {
            log::warn!("tableau.columns is empty; using {:?}", defaults.columns);
            self.columns = defaults.columns;
        }
        if self.rows.is_empty() {
            log::warn!("tableau.rows is empty; using {:?}", defaults.rows);
            self.rows = defaults.rows;
        }
    }

    /// Where the session lives: `session.file`, or `session.json` in the
    /// config directory.
    pub fn session_path(&self) -> PathBuf {
        self.session_file
            .clone()
            .unwrap_or_else(|| crate::config_dir().join("session.json"))
    }

    /// Create default settings file with comments
    fn create_default_file(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                log::warn!("Error creating config directory: {}", e);
                return;
            }
        }

        if let Err(e) = fs::write(path, DEFAULT_SETTINGS_FILE) {
            log::warn!("Error writing default settings.json: {}", e);
        }
    }
}
