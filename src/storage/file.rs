//! JSON Lines file store

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::{ResultStore, StoreError};
use crate::data::CheckRecord;

/// Appends one JSON object per line to a single file.
///
/// Lines are only ever appended. A scan reads the whole file and skips lines
/// that cannot be decoded, logging each one.
pub struct FileStore {
    path: PathBuf,
    /// Serialises appends so concurrent writers never interleave lines
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (and lazily create) the store file, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ResultStore for FileStore {
    async fn append(&self, record: &CheckRecord) -> Result<(), StoreError> {
        let mut line = serde_json::to_vec(record)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        line.push(b'\n');

        let _guard = self.write_lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        file.write_all(&line).await?;
        file.sync_data().await?;

        Ok(())
    }

    async fn scan_all(&self) -> Result<Vec<CheckRecord>, StoreError> {
        // Raw bytes: a line with invalid UTF-8 is skipped like any other
        let contents = match tokio::fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut records = Vec::new();
        for (idx, line) in contents.split(|b| *b == b'\n').enumerate() {
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }
            match serde_json::from_slice::<CheckRecord>(line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(
                        path = %self.path.display(),
                        line = idx + 1,
                        error = %e,
                        "Skipping unreadable check record"
                    );
                }
            }
        }

        Ok(records)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
