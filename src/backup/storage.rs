// Backup Storage Backends - in-memory and file system key-value collections

use super::types::BackupError;
use crate::message::MessageData;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, warn};

/// A named key-value collection holding message backups, keyed by backup name.
///
/// Every call is one independent transaction. `put` is an upsert and `delete`
/// of a missing key succeeds.
#[async_trait]
pub trait BackupStorage: Send + Sync {
    /// Name of the collection this storage reads and writes
    fn collection(&self) -> &str;

    /// Resolves once the storage can serve requests
    async fn ready(&self) -> Result<(), BackupError> {
        Ok(())
    }

    /// All stored backup names
    async fn keys(&self) -> Result<Vec<String>, BackupError>;
    /// The message stored under `name`, if any
    async fn get(&self, name: &str) -> Result<Option<MessageData>, BackupError>;
    /// Insert or replace the message stored under `name`
    async fn put(&self, name: &str, message: &MessageData) -> Result<(), BackupError>;
    /// Remove `name`; a missing key is not an error
    async fn delete(&self, name: &str) -> Result<(), BackupError>;
}

/// In-process storage. Keys enumerate in ascending order.
#[derive(Clone)]
pub struct MemoryBackupStorage {
    collection: String,
    entries: Arc<RwLock<BTreeMap<String, MessageData>>>,
}

impl MemoryBackupStorage {
    /// Create an empty collection named `collection`
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            entries: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Number of stored backups
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for MemoryBackupStorage {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_COLLECTION)
    }
}

#[async_trait]
impl BackupStorage for MemoryBackupStorage {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn keys(&self) -> Result<Vec<String>, BackupError> {
        Ok(self.entries.read().keys().cloned().collect())
    }

    async fn get(&self, name: &str) -> Result<Option<MessageData>, BackupError> {
        Ok(self.entries.read().get(name).cloned())
    }

    async fn put(&self, name: &str, message: &MessageData) -> Result<(), BackupError> {
        self.entries.write().insert(name.to_string(), message.clone());
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<(), BackupError> {
        self.entries.write().remove(name);
        Ok(())
    }
}

/// One JSON file per backup inside a collection directory.
///
/// Files are named `b-<sha256 of name>.json` and hold the backup name next to
/// the message, so any name (empty, very long, containing path separators)
/// maps to a short, valid file name.
pub struct FileBackupStorage {
    collection: String,
    directory: PathBuf,
}

#[derive(Serialize, Deserialize)]
struct FileEntry {
    name: String,
    message: MessageData,
}

const ENTRY_PREFIX: &str = "b-";

impl FileBackupStorage {
    /// Store the collection in `root/<collection>`
    pub fn new(root: impl AsRef<Path>, collection: impl Into<String>) -> Self {
        let collection = collection.into();
        Self {
            directory: root.as_ref().join(&collection),
            collection,
        }
    }

    /// Directory holding this collection's entry files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    async fn ensure_directory_exists(&self) -> Result<(), BackupError> {
        fs::create_dir_all(&self.directory)
            .await
            .map_err(|e| BackupError::IoError(format!("Failed to create backup directory: {}", e)))
    }

    fn entry_path(&self, name: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(name.as_bytes());
        self.directory
            .join(format!("{}{:x}.json", ENTRY_PREFIX, hasher.finalize()))
    }

    fn is_entry_file(path: &Path) -> bool {
        path.extension().and_then(|s| s.to_str()) == Some("json")
            && path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or(false, |s| s.starts_with(ENTRY_PREFIX))
    }

    async fn read_entry(path: &Path) -> Result<Option<FileEntry>, BackupError> {
        let json = match fs::read(path).await {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(BackupError::IoError(format!("Failed to read backup: {}", e))),
        };

        let entry = serde_json::from_slice(&json)
            .map_err(|e| BackupError::SerializationError(format!("Failed to deserialize backup: {}", e)))?;
        Ok(Some(entry))
    }
}

#[async_trait]
impl BackupStorage for FileBackupStorage {
    fn collection(&self) -> &str {
        &self.collection
    }

    async fn ready(&self) -> Result<(), BackupError> {
        self.ensure_directory_exists().await
    }

    async fn keys(&self) -> Result<Vec<String>, BackupError> {
        let mut entries = match fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(BackupError::IoError(format!(
                    "Failed to read backup directory: {}",
                    e
                )))
            }
        };

        let mut names = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| BackupError::IoError(format!("Failed to read directory entry: {}", e)))?
        {
            let path = entry.path();
            if !Self::is_entry_file(&path) {
                debug!(path = %path.display(), "Skipping foreign file in backup directory");
                continue;
            }

            match Self::read_entry(&path).await {
                Ok(Some(file_entry)) => names.push(file_entry.name),
                // Deleted between read_dir and read
                Ok(None) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable backup file"),
            }
        }

        names.sort();
        Ok(names)
    }

    async fn get(&self, name: &str) -> Result<Option<MessageData>, BackupError> {
        let entry = Self::read_entry(&self.entry_path(name)).await?;
        Ok(entry.filter(|entry| entry.name == name).map(|entry| entry.message))
    }

    async fn put(&self, name: &str, message: &MessageData) -> Result<(), BackupError> {
        self.ensure_directory_exists().await?;

        let entry = FileEntry {
            name: name.to_string(),
            message: message.clone(),
        };
        let json = serde_json::to_vec_pretty(&entry)
            .map_err(|e| BackupError::SerializationError(format!("Failed to serialize backup: {}", e)))?;

        fs::write(self.entry_path(name), json)
            .await
            .map_err(|e| BackupError::IoError(format!("Failed to write backup: {}", e)))
    }

    async fn delete(&self, name: &str) -> Result<(), BackupError> {
        match fs::remove_file(self.entry_path(name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BackupError::IoError(format!("Failed to delete backup: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_memory_storage_upsert_and_delete() {
        let storage = MemoryBackupStorage::new("backups");
        let first = MessageData::new().with("content", json!("one"));
        let second = MessageData::new().with("content", json!("two"));

        storage.put("Draft", &first).await.unwrap();
        storage.put("Draft", &second).await.unwrap();
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get("Draft").await.unwrap(), Some(second));

        storage.delete("Draft").await.unwrap();
        storage.delete("Draft").await.unwrap();
        assert!(storage.is_empty());
        assert_eq!(storage.get("Draft").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_storage_keys_are_ordered() {
        let storage = MemoryBackupStorage::default();
        for name in ["b", "a", "c"] {
            storage.put(name, &MessageData::new()).await.unwrap();
        }

        assert_eq!(storage.keys().await.unwrap(), vec!["a", "b", "c"]);
        assert_eq!(storage.collection(), "backups");
    }

    #[test]
    fn test_entry_paths_are_short_and_named() {
        let storage = FileBackupStorage::new("/tmp/hookdraft", "backups");
        let long_name = "x".repeat(400);

        for name in ["", "weekly/update (1)", long_name.as_str()] {
            let path = storage.entry_path(name);
            assert!(path.starts_with("/tmp/hookdraft/backups"));
            assert!(FileBackupStorage::is_entry_file(&path));
            assert!(path.file_name().unwrap().len() < 80);
        }

        assert_ne!(storage.entry_path("a"), storage.entry_path("b"));
        assert!(!FileBackupStorage::is_entry_file(Path::new("notes.json")));
        assert!(!FileBackupStorage::is_entry_file(Path::new("b-notes.txt")));
    }
}
