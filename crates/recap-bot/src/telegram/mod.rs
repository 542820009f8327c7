//! Minimal Telegram Bot API client.
//!
//! Handlers talk to the [`Transport`] seam; [`TelegramApi`] is the real
//! HTTP implementation. Delivery of status updates is best-effort: failing
//! to edit or send a progress message never aborts the operation that
//! produced it.

pub mod format;
mod types;

pub use types::{Chat, Message, Update, User};

use async_trait::async_trait;
use recap_core::{RecapError, RecapResult};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::warn;
use types::ApiResponse;

/// Longest message the bot will send; Telegram's hard limit is 4096.
pub const MAX_MESSAGE_LEN: usize = 4000;

const POLL_TIMEOUT_SECS: u64 = 20;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
// Must comfortably exceed the long-poll timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// A message the bot sent, for later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message_id: i64,
}

/// Outbound message delivery seam.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a message, returning a handle usable for edits.
    async fn send(&self, chat_id: i64, text: &str) -> RecapResult<SentMessage>;

    /// Replace the text of a previously sent message.
    async fn edit(&self, target: SentMessage, text: &str) -> RecapResult<()>;

    /// Send, logging and swallowing failures.
    async fn try_send(&self, chat_id: i64, text: &str) -> Option<SentMessage> {
        match self.send(chat_id, text).await {
            Ok(sent) => Some(sent),
            Err(error) => {
                warn!(chat_id, %error, "failed to send message");
                None
            }
        }
    }

    /// Edit, logging and swallowing failures.
    async fn try_edit(&self, target: SentMessage, text: &str) {
        if let Err(error) = self.edit(target, text).await {
            warn!(chat_id = target.chat_id, %error, "failed to edit message");
        }
    }

    /// Deliver `text` of any length: the first chunk edits `placeholder`
    /// when one exists, remaining chunks go out as new messages.
    async fn deliver(&self, chat_id: i64, placeholder: Option<SentMessage>, text: &str) {
        let mut chunks = format::split_message(text, MAX_MESSAGE_LEN).into_iter();
        let Some(first) = chunks.next() else {
            return;
        };
        match placeholder {
            Some(target) => self.try_edit(target, &first).await,
            None => {
                self.try_send(chat_id, &first).await;
            }
        }
        for chunk in chunks {
            self.try_send(chat_id, &chunk).await;
        }
    }
}

/// HTTP client for the Telegram Bot API.
pub struct TelegramApi {
    http: Client,
    base_url: String,
}

impl TelegramApi {
    pub fn new(token: &str) -> RecapResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RecapError::telegram(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: format!("https://api.telegram.org/bot{token}"),
        })
    }

    /// Long-poll for updates with ids at or above `offset`.
    pub async fn get_updates(&self, offset: i64) -> RecapResult<Vec<Update>> {
        let body = json!({
            "offset": offset,
            "timeout": POLL_TIMEOUT_SECS,
            "allowed_updates": ["message"],
        });
        self.call("getUpdates", &body).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
    ) -> RecapResult<T> {
        let url = format!("{}/{}", self.base_url, method);
        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| RecapError::telegram(format!("{method} request failed: {e}")))?;

        let parsed: ApiResponse<T> = response
            .json()
            .await
            .map_err(|e| RecapError::telegram(format!("{method} returned malformed body: {e}")))?;

        if !parsed.ok {
            let description = parsed
                .description
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(RecapError::telegram(format!("{method} failed: {description}")));
        }
        parsed
            .result
            .ok_or_else(|| RecapError::telegram(format!("{method} returned no result")))
    }
}

#[async_trait]
impl Transport for TelegramApi {
    async fn send(&self, chat_id: i64, text: &str) -> RecapResult<SentMessage> {
        // Try Markdown first; Telegram rejects the whole message on bad
        // entities, so fall back to plain text.
        let markdown = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        let result: RecapResult<Message> = self.call("sendMessage", &markdown).await;
        let message = match result {
            Ok(message) => message,
            Err(_) => {
                let plain = json!({ "chat_id": chat_id, "text": text });
                self.call("sendMessage", &plain).await?
            }
        };
        Ok(SentMessage {
            chat_id,
            message_id: message.message_id,
        })
    }

    async fn edit(&self, target: SentMessage, text: &str) -> RecapResult<()> {
        let markdown = json!({
            "chat_id": target.chat_id,
            "message_id": target.message_id,
            "text": text,
            "parse_mode": "Markdown",
        });
        let result: RecapResult<serde_json::Value> = self.call("editMessageText", &markdown).await;
        if result.is_err() {
            let plain = json!({
                "chat_id": target.chat_id,
                "message_id": target.message_id,
                "text": text,
            });
            let _: serde_json::Value = self.call("editMessageText", &plain).await?;
        }
        Ok(())
    }
}
