//! Outbound ports. Application calls into infrastructure.
//!
//! Implemented by adapters.

use crate::domain::{DomainError, FeedItem, FeedQuery};
use std::path::{Path, PathBuf};

/// Feed listing API. Yields submissions for a source/category, capped at `limit`.
#[async_trait::async_trait]
pub trait FeedPort: Send + Sync {
    /// Fetch items in listing order. Pagination is the adapter's concern.
    async fn fetch_items(&self, query: &FeedQuery) -> Result<Vec<FeedItem>, DomainError>;
}

/// Chat platform. One-shot session: connect, send, disconnect.
#[async_trait::async_trait]
pub trait ChatPort: Send + Sync {
    /// Establish the session. Returns the bot's display name once ready.
    async fn connect(&self) -> Result<String, DomainError>;

    /// Send a plain text message to the channel with the given name.
    async fn send_message(&self, channel_name: &str, text: &str) -> Result<(), DomainError>;

    /// Release the session. Safe to call after a failed send.
    async fn disconnect(&self) -> Result<(), DomainError>;
}

/// HTTP GET of a media URL.
#[async_trait::async_trait]
pub trait MediaFetchPort: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError>;
}

/// Local storage for downloaded media.
#[async_trait::async_trait]
pub trait MediaStorePort: Send + Sync {
    /// Create a fresh, timestamp-named directory for this run.
    async fn create_batch_dir(&self) -> Result<PathBuf, DomainError>;

    /// Write `bytes` to `dir/file_name`, replacing any existing file.
    async fn write_file(
        &self,
        dir: &Path,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, DomainError>;
}

/// Progress reporting for long loops (save-locally).
pub trait ProgressPort: Send + Sync {
    fn start(&self, total: u64, message: &str);
    fn advance(&self, item: &str);
    fn finish(&self, message: &str);
}

/// Progress sink that reports nothing. Used for non-interactive runs.
pub struct NoProgress;

impl ProgressPort for NoProgress {
    fn start(&self, _total: u64, _message: &str) {}
    fn advance(&self, _item: &str) {}
    fn finish(&self, _message: &str) {}
}
