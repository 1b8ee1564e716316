//! Implements ChatPort using the Discord REST API (bot token).
//!
//! A run is one short batch, so no gateway websocket is opened: "connect" checks the
//! token against `/users/@me`, sends are plain `POST /channels/{id}/messages`.
//! Channels are addressed by name and resolved across the bot's guilds.

use crate::domain::DomainError;
use crate::ports::ChatPort;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

const API_BASE: &str = "https://discord.com/api/v10";

/// Upper bound on consecutive 429 waits for a single request.
const MAX_RATE_LIMIT_WAITS: u32 = 10;

/// Wait used when a 429 carries neither a body nor a `Retry-After` header.
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(1);

/// Text and announcement channels accept messages.
const SENDABLE_CHANNEL_TYPES: &[u8] = &[0, 5];

#[derive(Debug, Deserialize)]
struct CurrentUser {
    username: String,
}

#[derive(Debug, Deserialize)]
struct PartialGuild {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RateLimitBody {
    retry_after: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuildChannel {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: u8,
}

/// Discord adapter. Caches channel name → id for the duration of a session.
pub struct DiscordChat {
    client: Client,
    token: String,
    channel_cache: Mutex<HashMap<String, String>>,
}

impl DiscordChat {
    pub fn new(token: String) -> Self {
        Self {
            client: Client::new(),
            token,
            channel_cache: Mutex::new(HashMap::new()),
        }
    }

    fn authorized(&self, req: RequestBuilder) -> RequestBuilder {
        req.header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
    }

    /// Send the request built by `build`, waiting out 429 responses and resending.
    async fn execute<F>(&self, build: F) -> Result<Response, DomainError>
    where
        F: Fn() -> RequestBuilder + Send + Sync,
    {
        for attempt in 0..MAX_RATE_LIMIT_WAITS {
            let res = self
                .authorized(build())
                .send()
                .await
                .map_err(|e| DomainError::Chat(format!("Request failed: {}", e)))?;
            let status = res.status();
            if status.is_success() {
                return Ok(res);
            }

            let retry_header = res
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let text = res.text().await.unwrap_or_else(|_| "unknown".to_string());
            match rate_limit_wait(status, retry_header.as_deref(), &text) {
                Some(wait) => {
                    warn!(
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        "Discord rate limit, sleeping"
                    );
                    tokio::time::sleep(wait).await;
                }
                None => {
                    return Err(DomainError::Chat(format!(
                        "Discord API error {}: {}",
                        status, text
                    )));
                }
            }
        }
        Err(DomainError::Chat("Discord rate limit: max retries".into()))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, DomainError> {
        let url = format!("{}{}", API_BASE, path);
        let res = self.execute(|| self.client.get(&url)).await?;
        res.json()
            .await
            .map_err(|e| DomainError::Chat(format!("Invalid response from {}: {}", path, e)))
    }

    /// Resolve a channel name to its id, scanning every guild the bot is in.
    async fn resolve_channel(&self, name: &str) -> Result<String, DomainError> {
        {
            let cache = self.channel_cache.lock().await;
            if let Some(id) = cache.get(name) {
                return Ok(id.clone());
            }
        }

        let guilds: Vec<PartialGuild> = self.get_json("/users/@me/guilds").await?;
        for guild in guilds {
            let channels: Vec<GuildChannel> = self
                .get_json(&format!("/guilds/{}/channels", guild.id))
                .await?;
            if let Some(channel) = find_channel(&channels, name) {
                debug!(guild = %guild.name, channel = %name, id = %channel.id, "resolved channel");
                self.channel_cache
                    .lock()
                    .await
                    .insert(name.to_string(), channel.id.clone());
                return Ok(channel.id.clone());
            }
        }
        Err(DomainError::Chat(format!(
            "channel '{}' not found in any guild",
            name
        )))
    }
}

/// First sendable channel with the exact name.
pub fn find_channel<'a>(channels: &'a [GuildChannel], name: &str) -> Option<&'a GuildChannel> {
    channels
        .iter()
        .find(|c| SENDABLE_CHANNEL_TYPES.contains(&c.kind) && c.name.as_deref() == Some(name))
}

/// How long to wait before resending, or `None` if the response is not a rate limit.
/// Prefers the JSON `retry_after` (seconds, fractional), then the `Retry-After` header.
pub fn rate_limit_wait(
    status: StatusCode,
    retry_after_header: Option<&str>,
    body: &str,
) -> Option<Duration> {
    if status != StatusCode::TOO_MANY_REQUESTS {
        return None;
    }
    let secs = serde_json::from_str::<RateLimitBody>(body)
        .ok()
        .map(|b| b.retry_after)
        .or_else(|| retry_after_header.and_then(|h| h.trim().parse::<f64>().ok()));
    Some(
        secs.and_then(|s| Duration::try_from_secs_f64(s).ok())
            .unwrap_or(DEFAULT_RETRY_AFTER),
    )
}

#[async_trait]
impl ChatPort for DiscordChat {
    async fn connect(&self) -> Result<String, DomainError> {
        let me: CurrentUser = self.get_json("/users/@me").await?;
        Ok(me.username)
    }

    async fn send_message(&self, channel_name: &str, text: &str) -> Result<(), DomainError> {
        let channel_id = self.resolve_channel(channel_name).await?;
        let url = format!("{}/channels/{}/messages", API_BASE, channel_id);
        let body = serde_json::json!({ "content": text });
        self.execute(|| self.client.post(&url).json(&body)).await?;
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), DomainError> {
        self.channel_cache.lock().await.clear();
        info!("Discord session closed");
        Ok(())
    }
}
