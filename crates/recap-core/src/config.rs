//! Environment-based configuration.
//!
//! All settings come from environment variables (a `.env` file is loaded at
//! startup by the bot binary). Only the Telegram token and the Groq API key
//! are required; everything else has a default.

use crate::error::{RecapError, RecapResult};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Primary Groq model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
/// Smaller model used when the primary's daily token quota runs out.
pub const DEFAULT_FALLBACK_MODEL: &str = "llama-3.1-8b-instant";

const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;
const DEFAULT_CACHE_CAPACITY: usize = 200;
const DEFAULT_SESSION_TTL_SECS: u64 = 2 * 60 * 60;
const DEFAULT_HISTORY_LIMIT: usize = 20;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 30 * 60;

/// Runtime configuration for the bot process.
#[derive(Debug, Clone)]
pub struct Config {
    pub telegram_token: String,
    pub groq_api_key: String,
    pub model: String,
    pub fallback_model: String,
    /// Maximum age of a cached transcript.
    pub cache_ttl: Duration,
    /// Maximum number of cached transcripts.
    pub cache_capacity: usize,
    /// Inactivity window after which a chat session is discarded.
    pub session_ttl: Duration,
    /// Number of Q&A turns kept per session.
    pub history_limit: usize,
    /// How often the background sweep removes expired sessions.
    pub sweep_interval: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> RecapResult<Self> {
        let telegram_token = env::var("TELEGRAM_TOKEN").map_err(|_| {
            RecapError::config(
                "TELEGRAM_TOKEN is not set. Get a token from @BotFather and add it to your .env file",
            )
        })?;
        let groq_api_key = env::var("GROQ_API_KEY")
            .map_err(|_| RecapError::config("GROQ_API_KEY is not set. Add it to your .env file"))?;

        let model = env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let fallback_model =
            env::var("GROQ_FALLBACK_MODEL").unwrap_or_else(|_| DEFAULT_FALLBACK_MODEL.to_string());

        Ok(Self {
            telegram_token,
            groq_api_key,
            model,
            fallback_model,
            cache_ttl: Duration::from_secs(parse_or(
                "RECAP_CACHE_TTL_SECS",
                env::var("RECAP_CACHE_TTL_SECS").ok(),
                DEFAULT_CACHE_TTL_SECS,
            )?),
            cache_capacity: parse_or(
                "RECAP_CACHE_CAPACITY",
                env::var("RECAP_CACHE_CAPACITY").ok(),
                DEFAULT_CACHE_CAPACITY,
            )?,
            session_ttl: Duration::from_secs(parse_or(
                "RECAP_SESSION_TTL_SECS",
                env::var("RECAP_SESSION_TTL_SECS").ok(),
                DEFAULT_SESSION_TTL_SECS,
            )?),
            history_limit: parse_or(
                "RECAP_HISTORY_LIMIT",
                env::var("RECAP_HISTORY_LIMIT").ok(),
                DEFAULT_HISTORY_LIMIT,
            )?,
            sweep_interval: Duration::from_secs(parse_or(
                "RECAP_SWEEP_INTERVAL_SECS",
                env::var("RECAP_SWEEP_INTERVAL_SECS").ok(),
                DEFAULT_SWEEP_INTERVAL_SECS,
            )?),
        })
    }
}

/// Parse an optional raw variable value, falling back to `default` when the
/// variable is unset. A present-but-invalid value is a configuration error.
fn parse_or<T: FromStr>(name: &str, raw: Option<String>, default: T) -> RecapResult<T> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| RecapError::config(format!("Invalid {name} value: {value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_or_uses_default_when_unset() {
        let value: usize = parse_or("X", None, 200).unwrap();
        assert_eq!(value, 200);
    }

    #[test]
    fn parse_or_parses_present_value() {
        let value: u64 = parse_or("X", Some("3600".to_string()), 10).unwrap();
        assert_eq!(value, 3600);
    }

    #[test]
    fn parse_or_rejects_garbage() {
        let result: RecapResult<usize> = parse_or("RECAP_CACHE_CAPACITY", Some("many".into()), 1);
        assert!(matches!(result, Err(RecapError::Config { .. })));
    }
}
