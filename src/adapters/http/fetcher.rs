//! Implements MediaFetchPort with a plain reqwest GET.

use crate::domain::DomainError;
use crate::ports::MediaFetchPort;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

/// Downloads media bodies fully into memory. Submissions are single images/clips.
pub struct HttpMediaFetcher {
    client: Client,
}

impl HttpMediaFetcher {
    pub fn new(user_agent: &str) -> Result<Self, DomainError> {
        let client = Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| DomainError::Download(format!("HTTP client init failed: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl MediaFetchPort for HttpMediaFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, DomainError> {
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DomainError::Download(format!("GET {} failed: {}", url, e)))?;

        check_status(url, res.status())?;

        let bytes = res
            .bytes()
            .await
            .map_err(|e| DomainError::Download(format!("reading body of {}: {}", url, e)))?;
        debug!(url, size = bytes.len(), "media fetched");
        Ok(bytes.to_vec())
    }
}

/// Error pages are not media: a non-success status fails the item instead of being saved.
fn check_status(url: &str, status: StatusCode) -> Result<(), DomainError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(DomainError::Download(format!("GET {} returned {}", url, status)))
    }
}
