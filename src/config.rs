//! Backup store configuration

use crate::backup::BackupError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Collection name used when none is configured
pub const DEFAULT_COLLECTION: &str = "backups";

/// Configuration for [`crate::BackupStore`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Key-value collection holding the backups
    pub collection: String,
    /// Root directory for file-backed storage; in-memory storage when unset
    pub storage_dir: Option<PathBuf>,
    /// When false, `initialize` does nothing (headless / server-side use)
    pub persistence_enabled: bool,
    /// Buffered list-change events per subscriber
    pub event_capacity: usize,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            storage_dir: None,
            persistence_enabled: true,
            event_capacity: 64,
        }
    }
}

impl BackupConfig {
    /// Default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the collection name
    pub fn collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Store backups as files under `dir`
    pub fn storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = Some(dir.into());
        self
    }

    /// Enable or skip loading on `initialize`
    pub fn persistence_enabled(mut self, enabled: bool) -> Self {
        self.persistence_enabled = enabled;
        self
    }

    /// Set the per-subscriber event buffer (at least 1)
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity.max(1); // broadcast channels need room for one event
        self
    }

    /// Load a JSON config file. Missing fields take their defaults.
    pub async fn from_json_file(path: impl AsRef<Path>) -> Result<Self, BackupError> {
        let json = tokio::fs::read_to_string(path.as_ref())
            .await
            .map_err(|e| BackupError::IoError(format!("Failed to read config: {}", e)))?;

        let config: Self = serde_json::from_str(&json)
            .map_err(|e| BackupError::SerializationError(format!("Failed to parse config: {}", e)))?;
        let capacity = config.event_capacity;
        Ok(config.event_capacity(capacity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BackupConfig::default();
        assert_eq!(config.collection, "backups");
        assert!(config.storage_dir.is_none());
        assert!(config.persistence_enabled);
        assert_eq!(config.event_capacity, 64);
    }

    #[test]
    fn test_builder() {
        let config = BackupConfig::new()
            .collection("drafts")
            .storage_dir("/var/lib/hookdraft")
            .persistence_enabled(false)
            .event_capacity(0);

        assert_eq!(config.collection, "drafts");
        assert_eq!(config.storage_dir, Some(PathBuf::from("/var/lib/hookdraft")));
        assert!(!config.persistence_enabled);
        assert_eq!(config.event_capacity, 1);
    }

    #[tokio::test]
    async fn test_from_json_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backup.json");
        tokio::fs::write(&path, r#"{"collection": "drafts"}"#).await.unwrap();

        let config = BackupConfig::from_json_file(&path).await.unwrap();
        assert_eq!(config, BackupConfig::new().collection("drafts"));
    }
}
