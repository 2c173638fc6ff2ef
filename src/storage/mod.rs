//! Append-only storage for check records

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::data::CheckRecord;

/// Persistence contract for check records.
///
/// There are no query predicates: readers always get every record, in no
/// particular order, and filter or sort in memory themselves.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Append one record
    async fn append(&self, record: &CheckRecord) -> Result<(), StoreError>;

    /// Read every stored record
    async fn scan_all(&self) -> Result<Vec<CheckRecord>, StoreError>;

    /// Human-readable location, for logs
    fn location(&self) -> String;
}

/// Where check records live
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Process-local, lost on exit
    Memory,
    /// JSON Lines file, one record per line
    File(PathBuf),
}

impl StoreLocation {
    /// Parse a location identifier: `memory`, or a file path
    pub fn parse(identifier: &str) -> Self {
        match identifier.trim() {
            "memory" | ":memory:" => StoreLocation::Memory,
            path => StoreLocation::File(PathBuf::from(path)),
        }
    }
}

impl Default for StoreLocation {
    fn default() -> Self {
        StoreLocation::File(PathBuf::from("./uptime_data/checks.jsonl"))
    }
}

/// Open the store at `location`
pub fn open_store(location: &StoreLocation) -> Result<Arc<dyn ResultStore>, StoreError> {
    Ok(match location {
        StoreLocation::Memory => Arc::new(MemoryStore::new()),
        StoreLocation::File(path) => Arc::new(FileStore::open(path)?),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Store operation timed out after {0}ms")]
    Timeout(u64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(StoreLocation::parse("memory"), StoreLocation::Memory);
        assert_eq!(
            StoreLocation::parse("/var/lib/uptime/checks.jsonl"),
            StoreLocation::File(PathBuf::from("/var/lib/uptime/checks.jsonl"))
        );
    }

    #[tokio::test]
    async fn test_open_memory_store() {
        let store = open_store(&StoreLocation::Memory).unwrap();
        assert!(store.scan_all().await.unwrap().is_empty());
        assert_eq!(store.location(), "memory");
    }
}
