// Backup System Types - Core data structures and errors

use serde::{Deserialize, Serialize};

/// Directory entry for one stored backup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackupRecord {
    /// Key the backup is stored under
    pub name: String,
}

impl BackupRecord {
    /// Record for the backup stored as `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Notification published by the store after the backup list is reloaded
#[derive(Debug, Clone, PartialEq)]
pub enum BackupEvent {
    /// The full, freshly loaded list of backups
    ListChanged(Vec<BackupRecord>),
}

/// An import item that could not be stored
#[derive(Debug, Clone, PartialEq)]
pub struct FailedImport {
    /// Collision-resolved name the item was going to be stored under
    pub name: String,
    /// Storage error that rejected the write
    pub error: String,
}

/// Per-item outcome of [`crate::BackupStore::import_backups`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportReport {
    /// Names the imported backups were stored under
    pub succeeded: Vec<String>,
    /// Items whose write failed
    pub failed: Vec<FailedImport>,
}

impl ImportReport {
    /// True when every item in the import was stored
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Number of backups found in the imported file
    pub fn total(&self) -> usize {
        self.succeeded.len() + self.failed.len()
    }
}

/// Errors raised by backup storage, import and export
#[derive(Debug, thiserror::Error)]
pub enum BackupError {
    /// Storage backend rejected an operation
    #[error("Storage error: {0}")]
    StorageError(String),
    /// File system failure
    #[error("IO error: {0}")]
    IoError(String),
    /// Stored or exported data could not be (de)serialized
    #[error("Serialization error: {0}")]
    SerializationError(String),
    /// Import file is malformed or has the wrong shape
    #[error("Invalid export data: {0}")]
    InvalidExport(String),
    /// Import file declares a version this crate does not read
    #[error("Unsupported export version: {0}")]
    UnsupportedVersion(u64),
    /// No backup stored under the name
    #[error("Backup {0} not found")]
    NotFound(String),
    /// Name is empty after normalization
    #[error("Invalid backup name: {0:?}")]
    InvalidName(String),
    /// Share fragment could not be decoded
    #[error("Invalid share link: {0}")]
    InvalidShareLink(String),
}
