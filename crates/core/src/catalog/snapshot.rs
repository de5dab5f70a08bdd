//! Durable catalog snapshots.

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::types::CacheSnapshot;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to write snapshot: {0}")]
    Write(#[from] std::io::Error),

    #[error("Failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage for the persisted cache document.
///
/// A snapshot that cannot be read or parsed is a cache miss, never an
/// error: `load` returns `None` and the next fetch cycle rebuilds it.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Option<CacheSnapshot>;
    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), SnapshotError>;
}

/// Snapshot store backed by a single JSON file, overwritten on save.
pub struct JsonSnapshotStore {
    path: PathBuf,
}

impl JsonSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonSnapshotStore {
    fn load(&self) -> Option<CacheSnapshot> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read cache snapshot");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unparsable cache snapshot");
                None
            }
        }
    }

    fn save(&self, snapshot: &CacheSnapshot) -> Result<(), SnapshotError> {
        let encoded = serde_json::to_string(snapshot)?;
        fs::write(&self.path, encoded)?;
        debug!(path = %self.path.display(), "Cache snapshot written");
        Ok(())
    }
}
