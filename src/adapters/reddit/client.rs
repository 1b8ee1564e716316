//! Implements FeedPort using the Reddit OAuth API.
//!
//! Application-only auth (client credentials). The bearer token is fetched on first
//! use and cached for the process lifetime; runs are short.

use crate::adapters::reddit::mapper::{self, Listing};
use crate::domain::{Category, DomainError, FeedItem, FeedQuery};
use crate::ports::FeedPort;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::debug;

const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Listing endpoints return at most this many children per request.
pub const MAX_PAGE_SIZE: u32 = 100;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Reddit listing adapter.
pub struct RedditFeed {
    client: Client,
    client_id: String,
    client_secret: String,
    user_agent: String,
    token: Mutex<Option<String>>,
}

impl RedditFeed {
    pub fn new(client_id: String, client_secret: String, user_agent: String) -> Self {
        Self {
            client: Client::new(),
            client_id,
            client_secret,
            user_agent,
            token: Mutex::new(None),
        }
    }

    async fn access_token(&self) -> Result<String, DomainError> {
        let mut cached = self.token.lock().await;
        if let Some(t) = cached.as_ref() {
            return Ok(t.clone());
        }

        let res = self
            .client
            .post(TOKEN_URL)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| DomainError::Feed(format!("Token request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Feed(format!(
                "Reddit auth error {}: {}",
                status, text
            )));
        }

        let body: TokenResponse = res
            .json()
            .await
            .map_err(|e| DomainError::Feed(format!("Invalid token response: {}", e)))?;
        *cached = Some(body.access_token.clone());
        Ok(body.access_token)
    }

    async fn fetch_page(
        &self,
        query: &FeedQuery,
        page_size: u32,
        after: Option<&str>,
    ) -> Result<Listing, DomainError> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/r/{}/{}",
            API_BASE,
            query.source,
            query.category.as_str()
        );

        let res = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .bearer_auth(token)
            .query(&listing_params(query.category, page_size, after))
            .send()
            .await
            .map_err(|e| DomainError::Feed(format!("Listing request failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            return Err(DomainError::Feed(format!(
                "Reddit API error {}: {}",
                status, text
            )));
        }

        res.json()
            .await
            .map_err(|e| DomainError::Feed(format!("Invalid listing response: {}", e)))
    }
}

#[async_trait]
impl FeedPort for RedditFeed {
    async fn fetch_items(&self, query: &FeedQuery) -> Result<Vec<FeedItem>, DomainError> {
        collect_pages(query.limit, |size, after| async move {
            let listing = self.fetch_page(query, size, after.as_deref()).await?;
            Ok(mapper::listing_to_domain(listing))
        })
        .await
    }
}

/// Query string for one listing request. `top` is all-time, not Reddit's default of one day.
fn listing_params(
    category: Category,
    page_size: u32,
    after: Option<&str>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("limit", page_size.to_string()),
        ("raw_json", "1".to_string()),
    ];
    if category == Category::Top {
        params.push(("t", "all".to_string()));
    }
    if let Some(a) = after {
        params.push(("after", a.to_string()));
    }
    params
}

/// Pages with the `after` cursor until `limit` items are collected or the listing ends.
/// `fetch_page(size, after)` returns one page and the cursor for the next one.
async fn collect_pages<F, Fut>(
    limit: Option<u32>,
    mut fetch_page: F,
) -> Result<Vec<FeedItem>, DomainError>
where
    F: FnMut(u32, Option<String>) -> Fut,
    Fut: Future<Output = Result<(Vec<FeedItem>, Option<String>), DomainError>>,
{
    let mut items = Vec::new();
    let mut after: Option<String> = None;

    loop {
        let size = page_size(limit, items.len());
        if size == 0 {
            break;
        }

        let (batch, next) = fetch_page(size, after.take()).await?;
        debug!(batch = batch.len(), after = ?next, "fetched listing page");

        let exhausted = batch.is_empty() || next.is_none();
        items.extend(batch);
        if exhausted {
            break;
        }
        after = next;
    }

    if let Some(limit) = limit {
        items.truncate(limit as usize);
    }
    Ok(items)
}

/// Size of the next page request given the cap and items collected so far.
fn page_size(limit: Option<u32>, collected: usize) -> u32 {
    match limit {
        Some(limit) => {
            let remaining = (limit as usize).saturating_sub(collected);
            remaining.min(MAX_PAGE_SIZE as usize) as u32
        }
        None => MAX_PAGE_SIZE,
    }
}
