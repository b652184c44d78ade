//! # Hookdraft Backup
//!
//! Named backups for a webhook message editor: save the message being edited
//! under a name, restore it later, and move backups between machines as
//! portable JSON export files.
//!
//! ## Quick Start
//!
//! ```rust
//! use hookdraft_backup::{BackupConfig, BackupStore, MessageEditor};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let editor = MessageEditor::new();
//! let store = BackupStore::from_config(&BackupConfig::default(), editor.clone());
//! store.initialize().await?;
//!
//! // Save whatever is in the editor
//! editor.update(|message| {
//!     message.insert("content", json!("Release notes"));
//! });
//! store.save_backup("Release", None).await?;
//!
//! // Export it and import it again under a collision-free name
//! let artifact = store.export_backup("Release").await?;
//! let report = store.import_backups(artifact.contents.as_bytes()).await?;
//! assert_eq!(report.succeeded, vec!["Release (1)".to_string()]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Export format
//!
//! Files are written as version 3 envelopes with `snake_case` keys:
//!
//! ```json
//! {
//!   "version": 3,
//!   "backups": [{ "name": "Release", "message": { "content": "Release notes" } }]
//! }
//! ```
//!
//! Version 1 (single backup, `camelCase` keys) and version 2 (single backup,
//! `snake_case` keys) files are still accepted on import.
//!
//! ## Modules
//!
//! - [`backup`]: the backup store, storage backends and export envelopes
//! - [`message`]: message data, the active editor and key casing conversion
//! - [`config`]: store configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Result type for backup operations
pub type Result<T> = std::result::Result<T, BackupError>;

/// Backup store, storage backends and export formats
pub mod backup;

/// Store configuration
pub mod config;

/// Message data and the active editor session
pub mod message;

pub use backup::{
    BackupError, BackupEvent, BackupRecord, BackupStorage, BackupStore, ExportArtifact, ExportData,
    FileBackupStorage, ImportReport, MemoryBackupStorage,
};
pub use config::BackupConfig;
pub use message::{Attachment, MessageData, MessageEditor};
