#![forbid(unsafe_code)]

//! JSON snapshots of a session's global state.
//!
//! A snapshot captures the *global* keys of one store — the part of a
//! session worth keeping across process restarts. Local keys are widget
//! lifetime state; they are rebuilt by the first render pass and are
//! deliberately not captured.
//!
//! Restoring merges: snapshot entries overwrite same-named keys and leave
//! everything else alone. Run a restore before the session's first pass so
//! initializers see the restored values and keep them.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use rillet_state::{StateStore, Value, is_local_key};

/// Errors from snapshot encode/decode and file I/O.
#[derive(Debug)]
pub enum SnapshotError {
    /// JSON encoding or decoding failed.
    Json(serde_json::Error),
    /// Reading or writing the snapshot file failed.
    Io(io::Error),
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(err) => write!(f, "snapshot JSON error: {err}"),
            Self::Io(err) => write!(f, "snapshot I/O error: {err}"),
        }
    }
}

impl std::error::Error for SnapshotError {}

impl From<serde_json::Error> for SnapshotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl From<io::Error> for SnapshotError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// The global entries of one store, in a stable, serializable shape.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateSnapshot {
    /// Captured global keys and their values, sorted by key.
    entries: BTreeMap<String, Value>,
}

impl StateSnapshot {
    /// Capture every global key of `store`. Local keys are skipped.
    #[must_use]
    pub fn capture(store: &StateStore) -> Self {
        let mut entries = BTreeMap::new();
        for key in store.keys() {
            if is_local_key(key) {
                continue;
            }
            if let Some(value) = store.get_opt(key) {
                entries.insert(key.to_owned(), value.clone());
            }
        }
        Self { entries }
    }

    /// Number of captured entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the snapshot captured nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write every captured entry into `store`, overwriting same-named
    /// keys and leaving all other keys alone.
    pub fn restore(&self, store: &mut StateStore) {
        for (key, value) in &self.entries {
            store.set(key.clone(), value.clone());
        }
        tracing::debug!(entries = self.entries.len(), "state snapshot restored");
    }

    /// Encode as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON produced by [`StateSnapshot::to_json`].
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode and write to a file.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Read a file and decode it.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}
