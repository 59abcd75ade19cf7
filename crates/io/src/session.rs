// Session files: a whole workbench state as pretty JSON
//
// {
//   "format_version": 1,
//   "saved_at": "2026-01-01T00:00:00Z",
//   "state": { "current": {...}, "history": [...], "previous_step": 2 }
// }

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabstep_engine::WorkbenchState;

use crate::error::SessionFileError;
use crate::SESSION_FORMAT_VERSION;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    pub format_version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: WorkbenchState,
}

/// Read only the version so newer files fail with a clear error instead of
/// a field mismatch.
#[derive(Deserialize)]
struct VersionProbe {
    format_version: u32,
}

impl SessionFile {
    pub fn new(state: WorkbenchState) -> Self {
        Self {
            format_version: SESSION_FORMAT_VERSION,
            saved_at: Utc::now(),
            state,
        }
    }
}

pub fn to_json_string(state: &WorkbenchState) -> Result<String, SessionFileError> {
    let file = SessionFile::new(state.clone());
    Ok(serde_json::to_string_pretty(&file)?)
}

pub fn from_json_str(json: &str) -> Result<SessionFile, SessionFileError> {
    let probe: VersionProbe = serde_json::from_str(json)?;
    if probe.format_version != SESSION_FORMAT_VERSION {
        return Err(SessionFileError::UnsupportedVersion {
            found: probe.format_version,
            expected: SESSION_FORMAT_VERSION,
        });
    }
    Ok(serde_json::from_str(json)?)
}

pub fn save(state: &WorkbenchState, path: &Path) -> Result<(), SessionFileError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = to_json_string(state)?;
    fs::write(path, json)?;
    log::info!(
        "saved session to {} ({} step(s))",
        path.display(),
        state.history().len()
    );
    Ok(())
}

pub fn load(path: &Path) -> Result<WorkbenchState, SessionFileError> {
    let json = fs::read_to_string(path)?;
    let file = from_json_str(&json)?;
    log::info!(
        "loaded session from {} ({} step(s), saved {})",
        path.display(),
        file.state.history().len(),
        file.saved_at.to_rfc3339()
    );
    Ok(file.state)
}

/// Load `path` if it exists, otherwise `None`.
pub fn load_if_exists(path: &Path) -> Result<Option<WorkbenchState>, SessionFileError> {
    if !path.exists() {
        return Ok(None);
    }
    load(path).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabstep_engine::{Action, Outcome, Workbench};
    use tempfile::tempdir;

    fn worked_session() -> WorkbenchState {
        let mut wb = Workbench::new();
        let actions = [
            Action::SetCell { row: 0, col: 0, text: "-3".into() },
            Action::SetCell { row: 1, col: 2, text: "4/3".into() },
            Action::TogglePivot { row: 1, col: 0 },
            Action::Advance,
            Action::AddColumn { label: Some("s1".into()) },
            Action::Advance,
            Action::SelectHistoryStep { step: 1 },
            Action::SetCell { row: 2, col: 3, text: "1".into() },
        ];
        for action in actions {
            let shown = format!("{:?}", action);
            assert_eq!(wb.apply(action), Outcome::Applied, "{}", shown);
        }
        assert_eq!(
            wb.apply(Action::SetCell { row: 1, col: 2, text: " 4/3 ".into() }),
            Outcome::Rejected
        );
        wb.into_state()
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let state = worked_session();

        save(&state, &path).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, state);
        assert_eq!(loaded.history()[0].id(), state.history()[0].id());
        assert_eq!(loaded.history()[0].cells()[1][2], "4/3");
        assert_eq!(loaded.selected_previous().map(|f| f.step()), Some(1));
        assert_eq!(loaded.current().cell(2, 3), Some("1"));
    }

    #[test]
    fn test_rejects_unknown_version() {
        let json = to_json_string(&WorkbenchState::initial()).unwrap();
        let bumped = json.replacen("\"format_version\": 1", "\"format_version\": 9", 1);

        match from_json_str(&bumped) {
            Err(SessionFileError::UnsupportedVersion { found, expected }) => {
                assert_eq!(found, 9);
                assert_eq!(expected, SESSION_FORMAT_VERSION);
            }
            other => panic!("expected version error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_ragged_grid() {
        let json = r#"{
            "format_version": 1,
            "saved_at": "2026-01-01T00:00:00Z",
            "state": {
                "current": { "col_vars": ["x1", "x2"], "row_vars": ["z"], "cells": [["1"]] },
                "history": [],
                "previous_step": null
            }
        }"#;
        let err = from_json_str(json).unwrap_err();
        assert!(matches!(err, SessionFileError::Parse(_)));
        assert!(err.to_string().contains("row 0"));
    }

    #[test]
    fn test_rejects_pivot_outside_grid() {
        let json = r#"{
            "format_version": 1,
            "saved_at": "2026-01-01T00:00:00Z",
            "state": {
                "current": {
                    "col_vars": ["x1"],
                    "row_vars": ["z"],
                    "cells": [[""]],
                    "pivot": { "row": 9, "col": 9 }
                },
                "history": [],
                "previous_step": null
            }
        }"#;
        let err = from_json_str(json).unwrap_err();
        assert!(matches!(err, SessionFileError::Parse(_)));
        assert!(err.to_string().contains("pivot (9, 9) is outside the 1x1 grid"));
    }

    #[test]
    fn test_load_if_exists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert!(load_if_exists(&path).unwrap().is_none());

        save(&WorkbenchState::initial(), &path).unwrap();
        assert_eq!(load_if_exists(&path).unwrap(), Some(WorkbenchState::initial()));
    }
}
