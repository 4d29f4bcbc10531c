//! JSON-file backed filer.
//!
//! Wraps [`MemoryBackend`] and writes its state to disk after every
//! successful mutation, so repeated invocations see each other's changes.

use super::Backend;
use super::memory::{FilerState, MemoryBackend};
use crate::error::Result;
use crate::tree::ResponseTree;
use crate::types::ObjectKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize)]
struct Snapshot {
    saved_at: DateTime<Utc>,
    #[serde(flatten)]
    state: FilerState,
}

/// Filer whose state lives in a JSON file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
    memory: MemoryBackend,
}

impl FileBackend {
    /// Open the state file, starting empty if it does not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let state = if path.exists() {
            let content = fs::read_to_string(&path)?;
            let snapshot: Snapshot = serde_json::from_str(&content)?;
            log::debug!(
                "Loaded filer state from {} (saved {})",
                path.display(),
                snapshot.saved_at
            );
            snapshot.state
        } else {
            log::debug!("Filer state file {} does not exist, starting empty", path.display());
            FilerState::default()
        };

        Ok(Self {
            path,
            memory: MemoryBackend::with_state(state),
        })
    }

    /// Location of the state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The in-memory filer holding the loaded state.
    pub fn memory(&self) -> &MemoryBackend {
        &self.memory
    }

    /// Write the current state to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let snapshot = Snapshot {
            saved_at: Utc::now(),
            state: self.memory.state(),
        };
        fs::write(&self.path, serde_json::to_string_pretty(&snapshot)?)?;
        log::debug!("Saved filer state to {}", self.path.display());
        Ok(())
    }
}

impl Backend for FileBackend {
    fn list(&self, kind: ObjectKind) -> Result<ResponseTree> {
        self.memory.list(kind)
    }

    fn create(&self, kind: ObjectKind, args: &[(String, String)]) -> Result<()> {
        self.memory.create(kind, args)?;
        self.save()
    }

    fn delete(&self, kind: ObjectKind, target: &str) -> Result<()> {
        self.memory.delete(kind, target)?;
        self.save()
    }
}
