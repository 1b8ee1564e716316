//! Implements MediaStorePort on the local filesystem.
//!
//! Each run writes into `{base}/{timestamp}` where the timestamp has `:` replaced by `,`
//! so the directory name is valid on every platform.

use crate::domain::DomainError;
use crate::ports::MediaStorePort;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

pub struct FsMediaStore {
    base_dir: PathBuf,
}

impl FsMediaStore {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }
}

/// `2024-05-01 13,45,06.123456` for 13:45:06.123456 local time.
pub fn batch_dir_name(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d %H:%M:%S%.6f")
        .to_string()
        .replace(':', ",")
}

#[async_trait::async_trait]
impl MediaStorePort for FsMediaStore {
    /// Fails if the directory already exists.
    async fn create_batch_dir(&self) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| DomainError::Storage(e.to_string()))?;
        let dir = self.base_dir.join(batch_dir_name(Local::now()));
        fs::create_dir(&dir)
            .await
            .map_err(|e| DomainError::Storage(format!("create {}: {}", dir.display(), e)))?;
        let abs = dir.canonicalize().unwrap_or_else(|_| dir.clone());
        info!(path = %abs.display(), "created batch directory");
        Ok(dir)
    }

    async fn write_file(
        &self,
        dir: &Path,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, DomainError> {
        let path = dir.join(file_name);
        fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::Storage(format!("write {}: {}", path.display(), e)))?;
        Ok(path)
    }
}
