//! Backup name handling

use super::types::BackupError;
use std::collections::HashSet;

/// Pick a name that is not in `taken`.
///
/// `name` is used unchanged when free, otherwise the first free
/// `"<name> (n)"` for `n = 1, 2, ...`.
pub fn safe_backup_name(name: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(name) {
        return name.to_string();
    }

    (1u64..)
        .map(|number| format!("{} ({})", name, number))
        .find(|proposed| !taken.contains(proposed))
        .unwrap_or_else(|| name.to_string())
}

/// Trim a user-typed name and collapse inner whitespace runs to one space
pub fn normalize_backup_name(name: &str) -> Result<String, BackupError> {
    let normalized = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Err(BackupError::InvalidName(name.to_string()));
    }
    Ok(normalized)
}
