// Backup System - named message backups, storage backends and export formats

pub mod export;
pub mod naming;
pub mod share;
pub mod storage;
pub mod store;
pub mod types;

pub use export::{ExportArtifact, ExportData, ExportedBackup, CURRENT_EXPORT_VERSION, EXPORT_CONTENT_TYPE};
pub use naming::{normalize_backup_name, safe_backup_name};
pub use share::{decode_share_fragment, encode_share_fragment, SHARE_PREFIX};
pub use storage::{BackupStorage, FileBackupStorage, MemoryBackupStorage};
pub use store::BackupStore;
pub use types::{BackupError, BackupEvent, BackupRecord, FailedImport, ImportReport};
