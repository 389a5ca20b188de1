//! Persisted run history.
//!
//! The store writes a complete snapshot after every history mutation and
//! reads it back once at startup. A present-but-unparsable snapshot is
//! surfaced as `MalformedState` so the caller can fall back to defaults.

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::model::RunRecord;

pub const STORE_FILE: &str = "cc_runs.json";

/// On-disk layout: run history plus the current-run pointer. Pipeline status
/// and view selection are session-local and deliberately absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub runs: Vec<RunRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_run_id: Option<String>,
}

/// Persistence seam for the run store. The store only ever loads once and
/// saves whole snapshots.
pub trait StatePersist {
    fn load(&self) -> AppResult<Option<Snapshot>>;
    fn save(&self, snapshot: &Snapshot) -> AppResult<()>;
}

/// Snapshot file under the platform data dir (or an explicit override).
pub struct JsonFileStore {
    path: PathBuf,
    readonly: bool,
}

impl JsonFileStore {
    pub fn new(path: PathBuf, readonly: bool) -> Self {
        Self { path, readonly }
    }
}

impl StatePersist for JsonFileStore {
    fn load(&self) -> AppResult<Option<Snapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        let snapshot = serde_json::from_str(&raw)
            .map_err(|e| AppError::MalformedState(format!("{}: {e}", self.path.display())))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> AppResult<()> {
        if self.readonly {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(snapshot)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// Default snapshot location: `<data dir>/claimcheck/cc_runs.json`.
pub fn default_store_path() -> AppResult<PathBuf> {
    let base = dirs::data_dir().ok_or_else(|| {
        AppError::Io(std::io::Error::other("no platform data directory available"))
    })?;
    Ok(base.join("claimcheck").join(STORE_FILE))
}

#[cfg(test)]
mod tests {
    use super::{JsonFileStore, Snapshot, StatePersist};
    use crate::error::AppError;
    use crate::model::{InputKind, RunRecord};

    fn record(id: &str) -> RunRecord {
        RunRecord {
            id: id.into(),
            started_at: "2026-08-29T10:00:00Z".into(),
            input_kind: InputKind::Transcript,
            report: None,
            error: Some("service unavailable".into()),
        }
    }

    #[test]
    fn missing_file_loads_as_absent() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("missing.json"), false);
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn snapshot_round_trips_runs_and_current_id() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let store = JsonFileStore::new(dir.path().join("nested").join("cc_runs.json"), false);
        let snapshot = Snapshot {
            runs: vec![record("r2"), record("r1")],
            current_run_id: Some("r2".into()),
        };
        store.save(&snapshot).expect("save");

        let loaded = store.load().expect("load").expect("present");
        assert_eq!(loaded.runs.len(), 2);
        assert_eq!(loaded.runs[0].id, "r2");
        assert_eq!(loaded.current_run_id.as_deref(), Some("r2"));
        assert_eq!(loaded.runs[1].error.as_deref(), Some("service unavailable"));
    }

    #[test]
    fn corrupt_file_is_reported_as_malformed_state() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("cc_runs.json");
        std::fs::write(&path, "{not json").expect("write");
        let store = JsonFileStore::new(path, false);
        match store.load() {
            Err(AppError::MalformedState(_)) => {}
            other => panic!("expected MalformedState, got {other:?}"),
        }
    }

    #[test]
    fn readonly_store_never_writes() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("cc_runs.json");
        let store = JsonFileStore::new(path.clone(), true);
        store.save(&Snapshot::default()).expect("save");
        assert!(!path.exists());
    }
}
