//! Durable Session Record
//!
//! A single JSON file at a fixed path records the in-flight transfer.
//! Its existence is the mutual-exclusion primitive: at most one
//! transfer session per installation, and a fresh `initialise` while
//! the file exists fails loudly.
//!
//! The write is flushed to disk before the first chunk is transferred,
//! so a crash between initiation and the first chunk still resumes
//! correctly from offset 0. An absent or unreadable file means Idle,
//! never an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::{Result, TransferError};

/// Persisted record of an in-flight transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// Provider-assigned resumable session URL
    pub upload_url: String,

    /// Opaque identifier of the chunk source's target
    pub source_descriptor: String,

    /// Declared content length in bytes, immutable once set
    pub total_length: u64,
}

/// Load/save/clear interface over the session record file.
pub struct SessionStateStore {
    path: PathBuf,
}

impl SessionStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted record. Absent means Idle; an unreadable
    /// record is discarded and also means Idle.
    pub fn load(&self) -> Result<Option<SessionState>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(TransferError::State(format!(
                    "reading {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "session record unreadable, treating as idle"
                );
                let _ = fs::remove_file(&self.path);
                Ok(None)
            }
        }
    }

    /// Persist the record, flushing to disk before returning. Must
    /// complete before the first chunk goes out.
    pub fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                TransferError::State(format!("creating {}: {}", parent.display(), e))
            })?;
        }

        let json = serde_json::to_vec(state)
            .map_err(|e| TransferError::State(format!("serializing session record: {}", e)))?;

        let write = || -> std::io::Result<()> {
            let mut file = fs::File::create(&self.path)?;
            file.write_all(&json)?;
            file.sync_all()
        };
        write().map_err(|e| {
            TransferError::State(format!("writing {}: {}", self.path.display(), e))
        })?;

        debug!(path = %self.path.display(), total_length = state.total_length, "session record saved");
        Ok(())
    }

    /// Remove the record. Idempotent: clearing an absent record is ok.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "session record cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TransferError::State(format!(
                "removing {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
