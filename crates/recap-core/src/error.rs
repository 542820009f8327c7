//! Error types for the recap crates.

use thiserror::Error;

/// Result type alias for recap operations.
pub type RecapResult<T> = Result<T, RecapError>;

/// Main error type for the recap crates.
///
/// Store-level absence (cache miss, unknown chat, no video loaded) is never
/// an error; those conditions are `Option`s at the call sites. This type only
/// covers upstream-service failures and configuration problems.
#[derive(Error, Debug, Clone)]
pub enum RecapError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Text-generation backend errors
    #[error("LLM error: {message}")]
    Llm {
        message: String,
        model: Option<String>,
    },

    /// Transcript fetch errors
    #[error(transparent)]
    Transcript(#[from] TranscriptError),

    /// Telegram transport errors
    #[error("Telegram error: {message}")]
    Telegram { message: String },
}

impl RecapError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            model: None,
        }
    }

    /// Create an LLM error tagged with the model that produced it
    pub fn llm_with_model(message: impl Into<String>, model: impl Into<String>) -> Self {
        Self::Llm {
            message: message.into(),
            model: Some(model.into()),
        }
    }

    /// Create a Telegram transport error
    pub fn telegram(message: impl Into<String>) -> Self {
        Self::Telegram {
            message: message.into(),
        }
    }

    /// Whether this is a transient rate-limit condition worth retrying
    /// against the same model.
    pub fn is_retryable(&self) -> bool {
        match self {
            RecapError::Llm { message, .. } => {
                if self.is_daily_quota() {
                    return false;
                }
                let message = message.to_lowercase();
                message.contains("429") || message.contains("rate limit")
            }
            _ => false,
        }
    }

    /// Whether the model's daily token quota is exhausted. Not worth
    /// retrying; the caller should switch to the fallback model instead.
    pub fn is_daily_quota(&self) -> bool {
        match self {
            RecapError::Llm { message, .. } => {
                let message = message.to_lowercase();
                message.contains("tokens per day") || message.contains("tpd")
            }
            _ => false,
        }
    }
}

/// Why a transcript could not be fetched for a video.
///
/// None of these are cached or retried; each maps to a fixed user-facing
/// message via [`TranscriptError::user_message`].
#[derive(Error, Debug, Clone)]
pub enum TranscriptError {
    #[error("transcripts are disabled for this video")]
    CaptionsDisabled,

    #[error("no transcript found for this video")]
    NotFound,

    #[error("video unavailable")]
    VideoUnavailable,

    #[error("transcript fetch failed: {message}")]
    Fetch { message: String },
}

impl TranscriptError {
    /// Human-readable message shown to the chat when a fetch fails.
    pub fn user_message(&self) -> String {
        match self {
            TranscriptError::CaptionsDisabled => {
                "❌ Transcripts are disabled for this video.".to_string()
            }
            TranscriptError::NotFound => {
                "❌ No transcript found. This video may not have captions.".to_string()
            }
            TranscriptError::VideoUnavailable => "❌ Video unavailable or invalid URL.".to_string(),
            TranscriptError::Fetch { message } => {
                format!("❌ Could not fetch transcript: {message}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_errors_are_retryable() {
        let error = RecapError::llm_with_model("HTTP 429 Too Many Requests", "primary");
        assert!(error.is_retryable());
        assert!(!error.is_daily_quota());
    }

    #[test]
    fn daily_quota_is_not_retryable() {
        let error = RecapError::llm("Rate limit reached: tokens per day (TPD) exceeded");
        assert!(error.is_daily_quota());
        assert!(!error.is_retryable());
    }

    #[test]
    fn transcript_errors_are_not_retryable() {
        let error = RecapError::from(TranscriptError::CaptionsDisabled);
        assert!(!error.is_retryable());
    }
}
