//! In-process result store

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{ResultStore, StoreError};
use crate::data::CheckRecord;

/// Keeps records in a vector; used for tests and throwaway runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<CheckRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl ResultStore for MemoryStore {
    async fn append(&self, record: &CheckRecord) -> Result<(), StoreError> {
        self.records.write().push(record.clone());
        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<CheckRecord>, StoreError> {
        Ok(self.records.read().clone())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}
