//! Telegram bot entry point: long-polling loop plus the background sweeper.

mod handlers;
mod telegram;

use handlers::Services;
use recap_core::{
    Config, LlmClient, RecapResult, SessionStore, TranscriptCache, YouTubeTranscriptClient,
};
use std::sync::Arc;
use std::time::Duration;
use telegram::{TelegramApi, Transport, Update};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// How long to wait before polling again after a transport error.
const POLL_RETRY_DELAY: Duration = Duration::from_secs(2);

#[tokio::main]
async fn main() -> RecapResult<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let api = Arc::new(TelegramApi::new(&config.telegram_token)?);
    let cache = Arc::new(TranscriptCache::new(config.cache_ttl, config.cache_capacity));
    let sessions = Arc::new(SessionStore::new(config.session_ttl, config.history_limit));
    let llm = Arc::new(LlmClient::new(
        &config.groq_api_key,
        &config.model,
        &config.fallback_model,
    )?);
    let fetcher = Arc::new(YouTubeTranscriptClient::new()?);

    let services = Services {
        telegram: api.clone(),
        cache: cache.clone(),
        sessions: sessions.clone(),
        llm,
        fetcher,
    };

    spawn_sweeper(config.sweep_interval, sessions, cache);

    info!(model = %config.model, "bot started, polling for updates");
    run_polling(api, services).await
}

/// Periodically drop expired sessions and log store health.
fn spawn_sweeper(interval: Duration, sessions: Arc<SessionStore>, cache: Arc<TranscriptCache>) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; there is nothing to sweep yet.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let removed = sessions.sweep_expired();
            let active = sessions.count_active();
            if removed > 0 {
                info!(removed, active, "swept expired sessions");
            }
            let stats = cache.stats();
            debug!(
                entries = stats.entries,
                total_hits = stats.total_hits,
                "transcript cache"
            );
        }
    });
}

async fn run_polling(api: Arc<TelegramApi>, services: Services) -> RecapResult<()> {
    let mut offset = 0i64;
    loop {
        let updates = match api.get_updates(offset).await {
            Ok(updates) => updates,
            Err(error) => {
                warn!(%error, "getUpdates failed, backing off");
                tokio::time::sleep(POLL_RETRY_DELAY).await;
                continue;
            }
        };

        for update in updates {
            offset = offset.max(update.update_id + 1);
            let services = services.clone();
            tokio::spawn(async move {
                handle_update(services, update).await;
            });
        }
    }
}

async fn handle_update(services: Services, update: Update) {
    let Some(message) = update.message else {
        return;
    };
    let Some(text) = message.text else {
        return;
    };
    let chat_id = message.chat.id;
    let first_name = message
        .from
        .as_ref()
        .and_then(|user| user.first_name.as_deref());

    if let Err(error) = handlers::dispatch(&services, chat_id, &text, first_name).await {
        error!(chat_id, %error, "message handling failed");
        services
            .telegram
            .try_send(chat_id, "⚠️ Something went wrong. Please try again.")
            .await;
    }
}
