//! Durable snapshot adapters for the project store.
//!
//! The store persists a single keyed blob holding the full project list and
//! the active-project pointer. Transient flags (generation busy markers) are
//! deliberately not part of the snapshot.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreResult;
use crate::project::model::Project;

/// The persisted state: everything the store must recover after a reload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSnapshot {
    pub projects: Vec<Project>,
    pub active_project_id: Option<String>,
}

/// Persistence seam for the store: invoked synchronously after every accepted
/// mutation, so a returned `Ok` means the mutation survives a reload.
pub trait SnapshotStore: Send {
    /// Loads the last saved snapshot, or `None` if nothing was ever saved.
    fn load(&self) -> StoreResult<Option<StoreSnapshot>>;

    /// Replaces the saved snapshot. Must be atomic per write: a reader never
    /// observes a half-written snapshot.
    fn save(&self, snapshot: &StoreSnapshot) -> StoreResult<()>;
}

// =============================================================================
// FILE ADAPTER
// =============================================================================

/// File-backed snapshot storage (JSON blob).
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// crash mid-write leaves the previous snapshot intact.
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> StoreResult<Option<StoreSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, snapshot: &StoreSnapshot) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let raw = serde_json::to_string(snapshot)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

// =============================================================================
// IN-MEMORY ADAPTER
// =============================================================================

/// In-memory snapshot storage, for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemorySnapshotStore {
    inner: Mutex<Option<StoreSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> StoreResult<Option<StoreSnapshot>> {
        let guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(guard.clone())
    }

    fn save(&self, snapshot: &StoreSnapshot) -> StoreResult<()> {
        let mut guard = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        *guard = Some(snapshot.clone());
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("lenscore.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("lenscore.json"));

        let snapshot = StoreSnapshot {
            projects: vec![Project::new("p-1").with_title("Night Market")],
            active_project_id: Some("p-1".to_string()),
        };
        store.save(&snapshot).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, snapshot);
        // No temp file left behind
        assert!(!store.tmp_path().exists());
    }

    #[test]
    fn test_file_store_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::new(dir.path().join("nested/deeper/lenscore.json"));
        store.save(&StoreSnapshot::default()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemorySnapshotStore::new();
        assert!(store.load().unwrap().is_none());

        let snapshot = StoreSnapshot {
            projects: vec![Project::new("p-1")],
            active_project_id: None,
        };
        store.save(&snapshot).unwrap();
        assert_eq!(store.load().unwrap().unwrap(), snapshot);
    }

    #[test]
    fn test_snapshot_wire_format() {
        let snapshot = StoreSnapshot {
            projects: vec![],
            active_project_id: Some("abc".to_string()),
        };
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["activeProjectId"], "abc");
    }
}
