// Export envelopes - versioned wire format for portable backup files

use super::types::BackupError;
use crate::message::MessageData;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Envelope version written by [`ExportData::to_json_pretty`]
pub const CURRENT_EXPORT_VERSION: u64 = 3;

/// Content type of exported backup files
pub const EXPORT_CONTENT_TYPE: &str = "application/json";

/// One named backup inside a version 3 envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedBackup {
    /// Name the backup was stored under when exported
    pub name: String,
    /// Message in external casing
    pub message: MessageData,
}

/// A parsed export file.
///
/// Messages are kept exactly as they appear in the file; converting them to
/// internal casing is up to the importer.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportData {
    /// Single backup, message already in internal casing
    V1 {
        /// Proposed backup name
        name: String,
        /// Message in internal casing
        message: MessageData,
    },
    /// Single backup, message in external casing
    V2 {
        /// Proposed backup name
        name: String,
        /// Message in external casing
        message: MessageData,
    },
    /// Batch of backups, messages in external casing
    V3 {
        /// Backups in file order
        backups: Vec<ExportedBackup>,
    },
}

#[derive(Deserialize)]
struct SingleEnvelope {
    name: String,
    message: MessageData,
}

#[derive(Deserialize)]
struct BatchEnvelope {
    backups: Vec<ExportedBackup>,
}

#[derive(Serialize)]
struct BatchEnvelopeRef<'a> {
    version: u64,
    backups: &'a [ExportedBackup],
}

impl ExportData {
    /// Wrap a single backup in a current-version envelope
    pub fn single(name: impl Into<String>, message: MessageData) -> Self {
        ExportData::V3 {
            backups: vec![ExportedBackup {
                name: name.into(),
                message,
            }],
        }
    }

    /// Envelope version this data was parsed from
    pub fn version(&self) -> u64 {
        match self {
            ExportData::V1 { .. } => 1,
            ExportData::V2 { .. } => 2,
            ExportData::V3 { .. } => 3,
        }
    }

    /// Parse an export file of any supported version
    pub fn parse(bytes: &[u8]) -> Result<Self, BackupError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| BackupError::InvalidExport(format!("Malformed JSON: {}", e)))?;

        let version = match value.get("version") {
            Some(Value::Number(number)) => number
                .as_u64()
                .ok_or_else(|| BackupError::InvalidExport(format!("Invalid version {}", number)))?,
            Some(other) => {
                return Err(BackupError::InvalidExport(format!("Invalid version {}", other)))
            }
            None => return Err(BackupError::InvalidExport("Missing version field".to_string())),
        };

        match version {
            1 | 2 => {
                let SingleEnvelope { name, message } = serde_json::from_value(value)
                    .map_err(|e| BackupError::InvalidExport(e.to_string()))?;
                if version == 1 {
                    Ok(ExportData::V1 { name, message })
                } else {
                    Ok(ExportData::V2 { name, message })
                }
            }
            3 => {
                let BatchEnvelope { backups } = serde_json::from_value(value)
                    .map_err(|e| BackupError::InvalidExport(e.to_string()))?;
                Ok(ExportData::V3 { backups })
            }
            other => Err(BackupError::UnsupportedVersion(other)),
        }
    }

    /// Serialize with two-space indentation.
    ///
    /// Single-backup versions are written as a one-item batch, so the output
    /// is always a current-version envelope.
    pub fn to_json_pretty(&self) -> Result<String, BackupError> {
        let single;
        let backups: &[ExportedBackup] = match self {
            ExportData::V1 { name, message } | ExportData::V2 { name, message } => {
                single = [ExportedBackup {
                    name: name.clone(),
                    message: message.clone(),
                }];
                &single[..]
            }
            ExportData::V3 { backups } => backups.as_slice(),
        };

        serde_json::to_string_pretty(&BatchEnvelopeRef {
            version: CURRENT_EXPORT_VERSION,
            backups,
        })
        .map_err(|e| BackupError::SerializationError(format!("Failed to serialize export: {}", e)))
    }
}

/// A serialized export ready to hand to the user as a download
#[derive(Debug, Clone, PartialEq)]
pub struct ExportArtifact {
    /// Suggested file name (the backup name)
    pub file_name: String,
    /// MIME type of `contents`
    pub content_type: &'static str,
    /// Serialized export file
    pub contents: String,
}

impl ExportArtifact {
    /// JSON artifact named `file_name`
    pub fn new(file_name: impl Into<String>, contents: String) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: EXPORT_CONTENT_TYPE,
            contents,
        }
    }

    /// Write the artifact into `directory` and return the written path.
    ///
    /// Path separators in the suggested name are replaced and a `.json`
    /// extension is appended.
    pub async fn write_to_dir(&self, directory: impl AsRef<Path>) -> Result<PathBuf, BackupError> {
        let directory = directory.as_ref();
        fs::create_dir_all(directory)
            .await
            .map_err(|e| BackupError::IoError(format!("Failed to create export directory: {}", e)))?;

        let path = directory.join(format!("{}.json", sanitize_file_name(&self.file_name)));
        fs::write(&path, self.contents.as_bytes())
            .await
            .map_err(|e| BackupError::IoError(format!("Failed to write export: {}", e)))?;
        Ok(path)
    }
}

fn sanitize_file_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match cleaned.trim() {
        "" | "." | ".." => "backup".to_string(),
        trimmed => trimmed.to_string(),
    }
}
