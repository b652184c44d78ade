//! URL fragment encoding for shared backups (`backup:<base64url JSON>`)

use super::types::BackupError;
use crate::message::MessageData;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Prefix identifying a share fragment
pub const SHARE_PREFIX: &str = "backup:";

/// Encode a message as a share fragment
pub fn encode_share_fragment(message: &MessageData) -> Result<String, BackupError> {
    let json = serde_json::to_vec(message)
        .map_err(|e| BackupError::SerializationError(format!("Failed to serialize backup: {}", e)))?;
    Ok(format!("{}{}", SHARE_PREFIX, URL_SAFE_NO_PAD.encode(json)))
}

/// Decode a share fragment. A leading `#` and base64 padding are accepted.
pub fn decode_share_fragment(fragment: &str) -> Result<MessageData, BackupError> {
    let payload = fragment
        .trim()
        .trim_start_matches('#')
        .strip_prefix(SHARE_PREFIX)
        .ok_or_else(|| BackupError::InvalidShareLink(format!("missing {:?} prefix", SHARE_PREFIX)))?;

    let json = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| BackupError::InvalidShareLink(e.to_string()))?;

    serde_json::from_slice(&json).map_err(|e| BackupError::InvalidShareLink(e.to_string()))
}
