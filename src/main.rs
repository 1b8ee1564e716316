//! Wiring & DI. Entry point: bootstrap adapters, inject into services, run once.
//! No business logic here; classification lives in the domain layer.

use dotenv::dotenv;
use reddit_relay::adapters::discord::DiscordChat;
use reddit_relay::adapters::http::HttpMediaFetcher;
use reddit_relay::adapters::persistence::FsMediaStore;
use reddit_relay::adapters::reddit::RedditFeed;
use reddit_relay::adapters::ui::progress::IndicatifProgress;
use reddit_relay::adapters::ui::tui::{self, Target, TuiInputPort};
use reddit_relay::ports::{
    ChatPort, FeedPort, InputPort, MediaFetchPort, MediaStorePort, NoProgress, ProgressPort,
};
use reddit_relay::shared::config::{AppConfig, RunMode};
use reddit_relay::usecases::{RelayService, SaveService, SubmissionReader};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!(cwd = %cwd.display(), "no .env found (check CWD)"),
    }

    reddit_relay::adapters::ui::init_ui();

    let cfg = AppConfig::load().map_err(|e| anyhow::anyhow!("config: {}", e))?;
    let mode = tui::select_mode(cfg.mode).map_err(|e| anyhow::anyhow!("{}", e))?;
    cfg.validate(mode).map_err(|e| anyhow::anyhow!("{}", e))?;
    info!(?mode, "run mode: {}", mode);

    let user_agent = cfg.reddit.user_agent.clone().unwrap_or_default();

    // --- Feed ---
    let feed: Arc<dyn FeedPort> = Arc::new(RedditFeed::new(
        cfg.reddit.client_id.clone().unwrap_or_default(),
        cfg.reddit.client_secret.clone().unwrap_or_default(),
        user_agent.clone(),
    ));
    let reader = SubmissionReader::new(feed, cfg.feed_query());

    // --- Destination ---
    let target = match mode {
        RunMode::Discord => {
            let chat: Arc<dyn ChatPort> = Arc::new(DiscordChat::new(
                cfg.discord.token.clone().unwrap_or_default(),
            ));
            Target::Chat(RelayService::new(
                chat,
                cfg.discord.channel.clone().unwrap_or_default(),
            ))
        }
        RunMode::Local => {
            let fetcher: Arc<dyn MediaFetchPort> = Arc::new(
                HttpMediaFetcher::new(&user_agent).map_err(|e| anyhow::anyhow!("{}", e))?,
            );
            let output_dir = cfg.output_dir_or_default();
            info!(path = %output_dir, "output directory: {}", output_dir);
            let store: Arc<dyn MediaStorePort> = Arc::new(FsMediaStore::new(&output_dir));
            // Bar only on a terminal; piped output gets the log lines alone.
            let progress: Arc<dyn ProgressPort> = if std::io::stdout().is_terminal() {
                Arc::new(IndicatifProgress::new())
            } else {
                Arc::new(NoProgress)
            };
            Target::Local(SaveService::new(fetcher, store, progress))
        }
    };

    // --- Run (read -> classify -> relay/save) ---
    let input_port: Arc<dyn InputPort> = Arc::new(TuiInputPort::new(reader, target));
    input_port
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    Ok(())
}
