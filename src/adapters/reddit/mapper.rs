//! Map Reddit listing JSON to domain entities.
//!
//! Only the fields the classifier reads are extracted; everything else is ignored.

use crate::domain::FeedItem;
use serde::Deserialize;

/// `GET /r/{sub}/{category}` response envelope.
#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub after: Option<String>,
    #[serde(default)]
    pub children: Vec<Thing>,
}

#[derive(Debug, Deserialize)]
pub struct Thing {
    /// `t3` for submissions.
    #[serde(default)]
    pub kind: String,
    pub data: RawSubmission,
}

#[derive(Debug, Deserialize)]
pub struct RawSubmission {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub media: Option<serde_json::Value>,
    #[serde(default)]
    pub over_18: bool,
}

/// Map a raw submission to a domain FeedItem. `null` media becomes `None`.
pub fn submission_to_domain(raw: RawSubmission) -> FeedItem {
    FeedItem {
        title: raw.title.unwrap_or_default(),
        url: raw.url.unwrap_or_default(),
        media: raw.media.filter(|m| !m.is_null()),
        is_adult: raw.over_18,
    }
}

/// Map a listing page. Returns the items (submissions only) and the `after` cursor.
pub fn listing_to_domain(listing: Listing) -> (Vec<FeedItem>, Option<String>) {
    let items = listing
        .data
        .children
        .into_iter()
        .filter(|t| t.kind == "t3")
        .map(|t| submission_to_domain(t.data))
        .collect();
    let after = listing.data.after.filter(|a| !a.is_empty());
    (items, after)
}
