//! Key-valued session record

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tab::FrozenState;

/// A typed value stored under one record key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum RecordValue {
    /// Engine snapshot of one tab
    State(FrozenState),
    /// URL-only slot for reserved internal pages
    Marker(String),
    Text(String),
    Bytes(Vec<u8>),
    Indices(Vec<usize>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    entries: BTreeMap<String, RecordValue>,
}

impl SessionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&RecordValue> {
        self.entries.get(key)
    }

    pub fn put(&mut self, key: impl Into<String>, value: RecordValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn get_text(&self, key: &str) -> Option<&str> {
        match self.entries.get(key)? {
            RecordValue::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn get_bytes(&self, key: &str) -> Option<&[u8]> {
        match self.entries.get(key)? {
            RecordValue::Bytes(bytes) => Some(bytes.as_slice()),
            _ => None,
        }
    }

    pub fn get_indices(&self, key: &str) -> Option<&[usize]> {
        match self.entries.get(key)? {
            RecordValue::Indices(indices) => Some(indices.as_slice()),
            _ => None,
        }
    }
}
