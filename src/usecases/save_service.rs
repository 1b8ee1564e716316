//! Save-locally mode: download each submission into a fresh batch directory.
//!
//! Best-effort: a failed download or write is logged and the loop moves on.

use crate::domain::{DomainError, ExtractedSubmission};
use crate::ports::{MediaFetchPort, MediaStorePort, ProgressPort};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

pub struct SaveService {
    fetcher: Arc<dyn MediaFetchPort>,
    store: Arc<dyn MediaStorePort>,
    progress: Arc<dyn ProgressPort>,
}

impl SaveService {
    pub fn new(
        fetcher: Arc<dyn MediaFetchPort>,
        store: Arc<dyn MediaStorePort>,
        progress: Arc<dyn ProgressPort>,
    ) -> Self {
        Self {
            fetcher,
            store,
            progress,
        }
    }

    /// Save all submissions. Only batch directory creation is fatal.
    pub async fn save_all(
        &self,
        submissions: &[ExtractedSubmission],
    ) -> Result<SaveStats, DomainError> {
        let dir = self.store.create_batch_dir().await?;
        info!(path = %dir.display(), count = submissions.len(), "Saving reddit submissions");

        let mut stats = SaveStats {
            dir: dir.clone(),
            ..Default::default()
        };
        self.progress
            .start(submissions.len() as u64, "Saving reddit submissions");

        for s in submissions {
            match self.save_one(&dir, s).await {
                Ok(path) => {
                    stats.saved += 1;
                    debug!(path = %path.display(), "saved submission");
                }
                Err(e) => {
                    stats.failed += 1;
                    error!(url = %s.url, title = %s.title, error = %e, "failed to save submission");
                }
            }
            self.progress.advance(&s.title);
        }

        self.progress.finish("Saved all reddit submissions");
        info!(
            saved = stats.saved,
            failed = stats.failed,
            path = %dir.display(),
            "Saved all reddit submissions"
        );
        Ok(stats)
    }

    async fn save_one(&self, dir: &Path, s: &ExtractedSubmission) -> Result<PathBuf, DomainError> {
        let bytes = self.fetcher.fetch(&s.url).await?;
        self.store.write_file(dir, &s.file_name(), &bytes).await
    }
}

/// Result of a save-locally run.
#[derive(Debug, Default)]
pub struct SaveStats {
    pub dir: PathBuf,
    pub saved: usize,
    pub failed: usize,
}
