//! In-process storage

use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{BundleStorage, SessionRecord};
use crate::error::Result;

/// DashMap-backed store. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    records: DashMap<String, SessionRecord>,
    writes: AtomicUsize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record directly, bypassing the write counter
    pub fn insert(&self, name: impl Into<String>, record: SessionRecord) {
        self.records.insert(name.into(), record);
    }

    pub fn get(&self, name: &str) -> Option<SessionRecord> {
        self.records.get(name).map(|entry| entry.value().clone())
    }

    /// Number of completed writes (for testing)
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BundleStorage for MemoryStorage {
    async fn read(&self, name: &str) -> Result<Option<SessionRecord>> {
        Ok(self.get(name))
    }

    async fn write(&self, name: &str, record: &SessionRecord) -> Result<()> {
        self.records.insert(name.to_string(), record.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.records.remove(name);
        Ok(())
    }
}
