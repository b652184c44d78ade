//! Editable message data and the active editor session

pub mod casing;

pub use casing::{to_camel_case, to_snake_case};

use bytes::Bytes;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Message payload as the editor holds it (content, embeds, username, ...).
///
/// The backup layer treats the payload as an opaque JSON object. Keys are in
/// internal (camelCase) casing unless converted for export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageData(Map<String, Value>);

impl MessageData {
    /// Create an empty message
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Get a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a top-level field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Builder-style variant of [`MessageData::insert`]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.insert(key, value);
        self
    }

    /// Remove a top-level field
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// True when the message has no fields
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying object
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a plain JSON value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// Rename every key (recursively) from external to internal casing
    pub fn to_internal_casing(&self) -> Self {
        Self::from_object(to_camel_case(&Value::Object(self.0.clone())))
    }

    /// Rename every key (recursively) from internal to external casing
    pub fn to_external_casing(&self) -> Self {
        Self::from_object(to_snake_case(&Value::Object(self.0.clone())))
    }

    // Key renaming never changes the shape of the root value.
    fn from_object(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::new(),
        }
    }
}

impl From<Map<String, Value>> for MessageData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for MessageData {
    type Error = Value;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

/// A binary file attached to the message being edited.
///
/// Attachments are sent with the webhook but never written to the backup store.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    /// File name shown in the editor
    pub name: String,
    /// Raw file contents
    pub content: Bytes,
}

impl Attachment {
    /// Create an attachment
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// The message currently open in the editor
#[derive(Debug, Clone, Default)]
pub struct ActiveMessage {
    /// Persistable message fields
    pub data: MessageData,
    /// Files attached to this message
    pub attachments: Vec<Attachment>,
}

/// Shared handle to the active editor message.
///
/// Cloning the handle shares the same message; the editor UI and the backup
/// store both hold one.
#[derive(Debug, Clone, Default)]
pub struct MessageEditor {
    inner: Arc<RwLock<ActiveMessage>>,
}

impl MessageEditor {
    /// Create an editor holding an empty message
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an editor holding `data`
    pub fn with_message(data: MessageData) -> Self {
        Self {
            inner: Arc::new(RwLock::new(ActiveMessage {
                data,
                attachments: Vec::new(),
            })),
        }
    }

    /// Snapshot of the message fields, without attachments
    pub fn message_data(&self) -> MessageData {
        self.inner.read().data.clone()
    }

    /// Snapshot of the attached files
    pub fn attachments(&self) -> Vec<Attachment> {
        self.inner.read().attachments.clone()
    }

    /// Replace the whole active message. Attachments are cleared.
    pub fn replace(&self, data: MessageData) {
        let mut active = self.inner.write();
        active.data = data;
        active.attachments.clear();
    }

    /// Mutate the message fields in place
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut MessageData),
    {
        f(&mut self.inner.write().data);
    }

    /// Attach a file to the active message
    pub fn attach(&self, attachment: Attachment) {
        self.inner.write().attachments.push(attachment);
    }
}
