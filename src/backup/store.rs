// Backup Store - named message backups with versioned import/export

use super::export::{ExportArtifact, ExportData};
use super::naming::{normalize_backup_name, safe_backup_name};
use super::share::{decode_share_fragment, encode_share_fragment};
use super::storage::{BackupStorage, FileBackupStorage, MemoryBackupStorage};
use super::types::{BackupError, BackupEvent, BackupRecord, FailedImport, ImportReport};
use crate::config::BackupConfig;
use crate::message::{MessageData, MessageEditor};
use futures::future::join_all;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Owns the list of stored backups and moves messages between the active
/// editor and the backing [`BackupStorage`].
///
/// The in-memory list is never edited piecemeal: every mutation is followed
/// by a full reload from storage, and each reload publishes
/// [`BackupEvent::ListChanged`] to subscribers.
pub struct BackupStore {
    storage: Arc<dyn BackupStorage>,
    editor: MessageEditor,
    backup_list: RwLock<Vec<BackupRecord>>,
    events: broadcast::Sender<BackupEvent>,
    persistence_enabled: bool,
}

impl BackupStore {
    /// Create a store over `storage` with default configuration
    pub fn new(storage: Arc<dyn BackupStorage>, editor: MessageEditor) -> Self {
        Self::with_storage(storage, editor, &BackupConfig::default())
    }

    /// Build a store from configuration, choosing file storage when
    /// `storage_dir` is set and in-memory storage otherwise.
    pub fn from_config(config: &BackupConfig, editor: MessageEditor) -> Self {
        let storage: Arc<dyn BackupStorage> = match &config.storage_dir {
            Some(dir) => Arc::new(FileBackupStorage::new(dir, config.collection.clone())),
            None => Arc::new(MemoryBackupStorage::new(config.collection.clone())),
        };
        Self::with_storage(storage, editor, config)
    }

    /// Create a store over `storage`, taking everything else from `config`.
    /// `config.collection` and `config.storage_dir` are ignored.
    pub fn with_storage(storage: Arc<dyn BackupStorage>, editor: MessageEditor, config: &BackupConfig) -> Self {
        let (events, _) = broadcast::channel(config.event_capacity.max(1));
        Self {
            storage,
            editor,
            backup_list: RwLock::new(Vec::new()),
            events,
            persistence_enabled: config.persistence_enabled,
        }
    }

    /// Handle to the active editor message
    pub fn editor(&self) -> &MessageEditor {
        &self.editor
    }

    /// Snapshot of the current backup list
    pub fn backup_list(&self) -> Vec<BackupRecord> {
        self.backup_list.read().clone()
    }

    /// Receive a [`BackupEvent::ListChanged`] after every list reload
    pub fn subscribe(&self) -> broadcast::Receiver<BackupEvent> {
        self.events.subscribe()
    }

    /// Wait for storage to become ready, then load the backup list
    pub async fn initialize(&self) -> Result<(), BackupError> {
        if !self.persistence_enabled {
            debug!(collection = self.storage.collection(), "Persistence disabled, skipping backup load");
            return Ok(());
        }

        self.storage.ready().await?;
        self.load_backup_list().await
    }

    /// Replace the in-memory list with the storage's current keys
    pub async fn load_backup_list(&self) -> Result<(), BackupError> {
        let keys = self.storage.keys().await?;
        let list: Vec<BackupRecord> = keys.into_iter().map(BackupRecord::new).collect();

        debug!(
            collection = self.storage.collection(),
            backup_count = list.len(),
            "Backup list reloaded"
        );

        *self.backup_list.write() = list.clone();
        // No subscribers is fine
        let _ = self.events.send(BackupEvent::ListChanged(list));
        Ok(())
    }

    /// Load a backup into the editor, replacing the active message.
    /// A missing backup loads an empty message.
    pub async fn load_backup(&self, name: &str) -> Result<(), BackupError> {
        let message = self.storage.get(name).await?;
        if message.is_none() {
            debug!(backup_name = %name, "Backup not found, loading empty message");
        }

        self.editor.replace(message.unwrap_or_default());
        Ok(())
    }

    /// Store `message` under `name`, or the active editor message when
    /// `message` is `None`. Attachments are never stored.
    pub async fn save_backup(&self, name: &str, message: Option<MessageData>) -> Result<(), BackupError> {
        let message = message.unwrap_or_else(|| self.editor.message_data());

        self.storage.put(name, &message).await?;
        info!(backup_name = %name, "Backup saved");

        self.load_backup_list().await
    }

    /// Save the active message under a user-typed name.
    ///
    /// The name is trimmed and inner whitespace collapsed; the normalized
    /// name is returned.
    pub async fn create_backup(&self, name: &str) -> Result<String, BackupError> {
        let name = normalize_backup_name(name)?;
        self.save_backup(&name, None).await?;
        Ok(name)
    }

    /// Remove a backup. Removing a missing backup succeeds.
    pub async fn delete_backup(&self, name: &str) -> Result<(), BackupError> {
        self.storage.delete(name).await?;
        info!(backup_name = %name, "Backup deleted");

        self.load_backup_list().await
    }

    /// Export a backup as a version 3 file with external key casing.
    /// A missing backup exports an empty message.
    pub async fn export_backup(&self, name: &str) -> Result<ExportArtifact, BackupError> {
        let message = self.storage.get(name).await?.unwrap_or_default();
        let contents = ExportData::single(name, message.to_external_casing()).to_json_pretty()?;

        debug!(backup_name = %name, bytes = contents.len(), "Backup exported");
        Ok(ExportArtifact::new(name, contents))
    }

    /// Import an export file of any supported version.
    ///
    /// Unparseable files and unknown versions are rejected without touching
    /// storage. Otherwise every backup in the file is stored under a
    /// collision-free name; batch items are written concurrently, each
    /// outcome is reported, and the list is reloaded once after all writes.
    pub async fn import_backups(&self, bytes: &[u8]) -> Result<ImportReport, BackupError> {
        let export = ExportData::parse(bytes).map_err(|e| {
            warn!(error = %e, "Rejected backup import");
            e
        })?;
        let version = export.version();

        let items: Vec<(String, MessageData)> = match export {
            ExportData::V1 { name, message } => vec![(name, message)],
            ExportData::V2 { name, message } => vec![(name, message.to_internal_casing())],
            ExportData::V3 { backups } => backups
                .into_iter()
                .map(|backup| (backup.name, backup.message.to_internal_casing()))
                .collect(),
        };

        // Names are resolved against the list as it is now, plus names handed
        // out earlier in this import.
        let mut taken: HashSet<String> = self
            .backup_list
            .read()
            .iter()
            .map(|record| record.name.clone())
            .collect();
        let planned: Vec<(String, MessageData)> = items
            .into_iter()
            .map(|(name, message)| {
                let name = safe_backup_name(&name, &taken);
                taken.insert(name.clone());
                (name, message)
            })
            .collect();

        // Writes go straight to storage; a reload per item could finish out
        // of order and leave a stale list behind.
        let writes = planned.into_iter().map(|(name, message)| async move {
            let result = self.storage.put(&name, &message).await;
            (name, result)
        });

        let mut report = ImportReport::default();
        for (name, result) in join_all(writes).await {
            match result {
                Ok(()) => {
                    debug!(backup_name = %name, "Backup imported");
                    report.succeeded.push(name);
                }
                Err(e) => {
                    warn!(backup_name = %name, error = %e, "Failed to import backup");
                    report.failed.push(FailedImport {
                        name,
                        error: e.to_string(),
                    });
                }
            }
        }

        if !report.succeeded.is_empty() {
            self.load_backup_list().await?;
        }

        info!(
            version = version,
            imported = report.succeeded.len(),
            failed = report.failed.len(),
            "Backup import finished"
        );
        Ok(report)
    }

    /// Share fragment (`backup:<base64url>`) for a stored backup
    pub async fn share_link(&self, name: &str) -> Result<String, BackupError> {
        let message = self
            .storage
            .get(name)
            .await?
            .ok_or_else(|| BackupError::NotFound(name.to_string()))?;
        encode_share_fragment(&message)
    }

    /// Decode a share fragment and load it into the editor
    pub async fn load_shared(&self, fragment: &str) -> Result<(), BackupError> {
        let message = decode_share_fragment(fragment)?;
        self.editor.replace(message);
        Ok(())
    }
}
