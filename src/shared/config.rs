//! Application configuration. API credentials, feed settings, paths.
//!
//! Loaded once at startup from an INI file plus `REDDIT_RELAY_*` environment overrides,
//! then treated as immutable.

use crate::domain::{Category, DomainError, FeedQuery};
use config::builder::DefaultState;
use config::{ConfigBuilder, Map, Source, Value};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Config file read when `REDDIT_RELAY_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "config.ini";

/// Directory the timestamped batch directories are created in.
pub const DEFAULT_OUTPUT_DIR: &str = ".";

const ENV_PREFIX: &str = "REDDIT_RELAY";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub reddit: RedditConfig,

    #[serde(default)]
    pub discord: DiscordConfig,

    /// Run mode. When unset the user is prompted. Read from REDDIT_RELAY_MODE.
    #[serde(default)]
    pub mode: Option<RunMode>,

    /// Parent of the per-run download directory. Read from REDDIT_RELAY_OUTPUT_DIR.
    #[serde(default)]
    pub output_dir: Option<String>,
}

/// `[reddit]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RedditConfig {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub user_agent: Option<String>,
    pub subreddit: Option<String>,
    #[serde(default)]
    pub category: Category,
    /// Max submissions to fetch. Unset = whatever the listing returns.
    #[serde(default)]
    pub limit: Option<u32>,
}

/// `[discord]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiscordConfig {
    pub token: Option<String>,
    /// Name of the destination text channel.
    #[serde(alias = "guild")]
    pub channel: Option<String>,
}

/// Top-level entry mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Send each submission to the configured chat channel.
    Discord,
    /// Download each submission into a local directory.
    Local,
}

impl RunMode {
    pub const ALL: [RunMode; 2] = [RunMode::Discord, RunMode::Local];

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "discord" | "chat" | "send" => Some(RunMode::Discord),
            "local" | "save" | "disk" => Some(RunMode::Local),
            _ => None,
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::Discord => f.write_str("Send submissions to Discord"),
            RunMode::Local => f.write_str("Save submissions locally"),
        }
    }
}

impl<'de> Deserialize<'de> for RunMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        RunMode::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown mode '{}'", s)))
    }
}

impl AppConfig {
    /// Load `.env`, then the INI file named by REDDIT_RELAY_CONFIG (default `config.ini`),
    /// then `REDDIT_RELAY_<SECTION>__<KEY>` environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let path = std::env::var("REDDIT_RELAY_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from(&path)
    }

    /// Load from a specific INI file (optional) plus environment overrides.
    pub fn load_from(path: &str) -> Result<Self, config::ConfigError> {
        Self::from_builder(
            config::Config::builder()
                .add_source(config::File::new(path, config::FileFormat::Ini).required(false))
                .add_source(
                    config::Environment::with_prefix(ENV_PREFIX)
                        .prefix_separator("_")
                        .separator("__"),
                ),
        )
    }

    /// INI keeps section/key case while environment keys arrive lowercased, so a
    /// `[REDDIT]` file plus `REDDIT_RELAY_REDDIT__LIMIT` would yield two sections.
    /// Fold everything to lowercase before deserializing.
    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, config::ConfigError> {
        let merged = builder.build()?.collect()?;
        let mut folded = config::Config::builder();
        for (key, value) in fold_key_case(merged) {
            folded = folded.set_override(key, value)?;
        }
        folded.build()?.try_deserialize()
    }

    /// Check everything the chosen mode needs, before any network call.
    pub fn validate(&self, mode: RunMode) -> Result<(), DomainError> {
        let r = &self.reddit;
        for (key, value) in [
            ("reddit.client_id", &r.client_id),
            ("reddit.client_secret", &r.client_secret),
            ("reddit.user_agent", &r.user_agent),
            ("reddit.subreddit", &r.subreddit),
        ] {
            require(key, value)?;
        }
        if r.limit == Some(0) {
            return Err(DomainError::Config(
                "reddit.limit must be a positive integer".into(),
            ));
        }
        if mode == RunMode::Discord {
            require("discord.token", &self.discord.token)?;
            require("discord.channel", &self.discord.channel)?;
        }
        Ok(())
    }

    /// Feed query built from the `[reddit]` section.
    pub fn feed_query(&self) -> FeedQuery {
        FeedQuery {
            source: self.reddit.subreddit.clone().unwrap_or_default(),
            category: self.reddit.category,
            limit: self.reddit.limit,
        }
    }

    /// Returns the output directory. Defaults to the current directory.
    pub fn output_dir_or_default(&self) -> String {
        self.output_dir
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_DIR.to_string())
    }
}

/// Flatten `section.key` paths in lowercase. Mixed-case keys come first so the
/// lowercase (environment) values override them.
fn fold_key_case(root: Map<String, Value>) -> Vec<(String, Value)> {
    let mut sections: Vec<(String, Value)> = root.into_iter().collect();
    sections.sort_by_key(|(k, _)| is_lowercase(k));

    let mut out = Vec::new();
    for (section, value) in sections {
        let section = section.to_lowercase();
        match value.clone().into_table() {
            Ok(table) => {
                let mut fields: Vec<(String, Value)> = table.into_iter().collect();
                fields.sort_by_key(|(k, _)| is_lowercase(k));
                out.extend(
                    fields
                        .into_iter()
                        .map(|(k, v)| (format!("{}.{}", section, k.to_lowercase()), v)),
                );
            }
            Err(_) => out.push((section, value)),
        }
    }
    out
}

fn is_lowercase(key: &str) -> bool {
    key == key.to_lowercase()
}

fn require(key: &str, value: &Option<String>) -> Result<(), DomainError> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(DomainError::Config(format!("missing required key {}", key))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_ini(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    fn full_config() -> AppConfig {
        AppConfig {
            reddit: RedditConfig {
                client_id: Some("id".into()),
                client_secret: Some("secret".into()),
                user_agent: Some("relay/0.1".into()),
                subreddit: Some("pics".into()),
                category: Category::Top,
                limit: Some(10),
            },
            discord: DiscordConfig {
                token: Some("token".into()),
                channel: Some("general".into()),
            },
            mode: None,
            output_dir: None,
        }
    }

    #[test]
    fn loads_sections_from_ini() {
        let f = write_ini(
            "[reddit]\n\
             client_id = abc\n\
             client_secret = shh\n\
             user_agent = relay test\n\
             subreddit = EarthPorn\n\
             category = Rising\n\
             limit = 25\n\
             \n\
             [discord]\n\
             token = t0k3n\n\
             guild = wallpapers\n",
        );
        let cfg = AppConfig::load_from(f.path().to_str().unwrap()).unwrap();

        assert_eq!(cfg.reddit.client_id.as_deref(), Some("abc"));
        assert_eq!(cfg.reddit.subreddit.as_deref(), Some("EarthPorn"));
        assert_eq!(cfg.reddit.category, Category::Rising);
        assert_eq!(cfg.reddit.limit, Some(25));
        assert_eq!(cfg.discord.channel.as_deref(), Some("wallpapers"));
        assert!(cfg.validate(RunMode::Discord).is_ok());
    }

    #[test]
    fn uppercase_sections_merge_with_lowercase_overrides() {
        let file = "[REDDIT]\n\
                    CLIENT_ID = abc\n\
                    client_secret = shh\n\
                    user_agent = relay test\n\
                    subreddit = pics\n\
                    limit = 25\n\
                    \n\
                    [DISCORD]\n\
                    token = t0k3n\n\
                    guild = wallpapers\n";
        let overrides = "[reddit]\nlimit = 5\n";
        let cfg = AppConfig::from_builder(
            config::Config::builder()
                .add_source(config::File::from_str(file, config::FileFormat::Ini))
                .add_source(config::File::from_str(overrides, config::FileFormat::Ini)),
        )
        .unwrap();

        assert_eq!(cfg.reddit.client_id.as_deref(), Some("abc"));
        assert_eq!(cfg.reddit.subreddit.as_deref(), Some("pics"));
        assert_eq!(cfg.reddit.limit, Some(5));
        assert_eq!(cfg.discord.channel.as_deref(), Some("wallpapers"));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = AppConfig::load_from("/nonexistent/reddit-relay.ini").unwrap();
        assert_eq!(cfg.reddit.category, Category::Hot);
        assert_eq!(cfg.reddit.limit, None);
        assert_eq!(cfg.output_dir_or_default(), ".");
    }

    #[test]
    fn validate_reports_missing_keys() {
        let mut cfg = full_config();
        cfg.reddit.client_secret = Some("  ".into());
        let err = cfg.validate(RunMode::Local).unwrap_err();
        assert!(err.to_string().contains("reddit.client_secret"));
    }

    #[test]
    fn discord_keys_only_required_for_discord_mode() {
        let mut cfg = full_config();
        cfg.discord = DiscordConfig::default();
        assert!(cfg.validate(RunMode::Local).is_ok());
        assert!(cfg.validate(RunMode::Discord).is_err());
    }

    #[test]
    fn zero_limit_is_rejected() {
        let mut cfg = full_config();
        cfg.reddit.limit = Some(0);
        assert!(cfg.validate(RunMode::Local).is_err());
    }

    #[test]
    fn feed_query_uses_reddit_section() {
        let q = full_config().feed_query();
        assert_eq!(q.source, "pics");
        assert_eq!(q.category, Category::Top);
        assert_eq!(q.limit, Some(10));
    }

    #[test]
    fn run_mode_parses_aliases() {
        assert_eq!(RunMode::parse("Discord"), Some(RunMode::Discord));
        assert_eq!(RunMode::parse("save"), Some(RunMode::Local));
        assert_eq!(RunMode::parse("email"), None);
    }
}
