//! Fetch feed items and classify them into relayable submissions.
//!
//! Shared by both run modes; the mode only decides what happens to the output.

use crate::domain::{DomainError, ExtractedSubmission, FeedQuery, MediaKind, extract_submissions};
use crate::ports::FeedPort;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct SubmissionReader {
    feed: Arc<dyn FeedPort>,
    query: FeedQuery,
}

impl SubmissionReader {
    pub fn new(feed: Arc<dyn FeedPort>, query: FeedQuery) -> Self {
        Self { feed, query }
    }

    /// Fetch up to `limit` items and classify them. Order follows the listing.
    pub async fn get_submissions(&self) -> Result<Vec<ExtractedSubmission>, DomainError> {
        info!(
            source = %self.query.source,
            category = %self.query.category,
            limit = ?self.query.limit,
            "Getting submissions from {}", self.query
        );
        let items = self.feed.fetch_items(&self.query).await?;
        let fetched = items.len();

        let submissions = extract_submissions(items, |item, skipped| {
            debug!(
                url = %item.url,
                rule = skipped.rule,
                reason = %skipped.reason,
                "skipping submission"
            )
        });

        let mut by_kind: HashMap<MediaKind, usize> = HashMap::new();
        for s in &submissions {
            *by_kind.entry(s.kind).or_default() += 1;
        }

        info!(
            fetched,
            kept = submissions.len(),
            hosted_gif = by_kind.get(&MediaKind::HostedGif).copied().unwrap_or(0),
            direct_image = by_kind.get(&MediaKind::DirectImage).copied().unwrap_or(0),
            embedded_video = by_kind.get(&MediaKind::EmbeddedVideo).copied().unwrap_or(0),
            "classified submissions"
        );
        Ok(submissions)
    }
}
