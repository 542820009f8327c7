//! Inbound message handling.
//!
//! The router sends slash commands to the command handler, messages with a
//! YouTube URL to the link handler and everything else to the Q&A handler.
//! Expected upstream failures are converted to user-facing text here; only
//! unexpected errors propagate to the global fallback in `main`.

mod commands;
mod link;
mod question;

#[cfg(test)]
mod tests;

pub use commands::handle_command;
pub use link::handle_link;
pub use question::handle_question;

use crate::telegram::Transport;
use recap_core::transcript::url;
use recap_core::{FetchTranscript, GenerateText, RecapError, RecapResult, SessionStore, TranscriptCache};
use std::sync::Arc;

/// Shared handles every handler works against. Constructed once at startup
/// and cloned into each message task.
#[derive(Clone)]
pub struct Services {
    pub telegram: Arc<dyn Transport>,
    pub cache: Arc<TranscriptCache>,
    pub sessions: Arc<SessionStore>,
    pub llm: Arc<dyn GenerateText>,
    pub fetcher: Arc<dyn FetchTranscript>,
}

/// Route one inbound text message.
pub async fn dispatch(
    services: &Services,
    chat_id: i64,
    text: &str,
    first_name: Option<&str>,
) -> RecapResult<()> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(());
    }
    if text.starts_with('/') {
        handle_command(services, chat_id, text, first_name).await
    } else if url::is_youtube_url(text) {
        handle_link(services, chat_id, text).await
    } else {
        handle_question(services, chat_id, text).await
    }
}

/// User-facing text for an upstream failure.
fn user_error_text(error: &RecapError) -> String {
    match error {
        RecapError::Transcript(transcript_error) => transcript_error.user_message(),
        other => format!("❌ Error: {other}"),
    }
}
