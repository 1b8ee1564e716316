//! Send-to-chat mode: post each submission's title, then its URL.
//!
//! Fail-fast: the first failed send aborts the remaining ones.

use crate::domain::{DomainError, ExtractedSubmission};
use crate::ports::ChatPort;
use std::sync::Arc;
use tracing::{info, warn};

pub struct RelayService {
    chat: Arc<dyn ChatPort>,
    channel_name: String,
}

impl RelayService {
    pub fn new(chat: Arc<dyn ChatPort>, channel_name: impl Into<String>) -> Self {
        Self {
            chat,
            channel_name: channel_name.into(),
        }
    }

    /// Connect, send every submission, disconnect. Returns the number of submissions sent.
    pub async fn relay(&self, submissions: &[ExtractedSubmission]) -> Result<usize, DomainError> {
        let user = self.chat.connect().await?;
        info!(user = %user, "Discord client {} is ready", user);

        let result = self.send_all(submissions).await;

        if let Err(e) = self.chat.disconnect().await {
            warn!(error = %e, "disconnect failed");
        }
        result
    }

    async fn send_all(&self, submissions: &[ExtractedSubmission]) -> Result<usize, DomainError> {
        info!(
            channel = %self.channel_name,
            count = submissions.len(),
            "Sending reddit submissions to channel {}", self.channel_name
        );
        for s in submissions {
            self.chat.send_message(&self.channel_name, &s.title).await?;
            self.chat.send_message(&self.channel_name, &s.url).await?;
        }
        info!(count = submissions.len(), "Sent all reddit submissions");
        Ok(submissions.len())
    }
}
