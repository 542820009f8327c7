//! Recap core library
//!
//! Shared state and upstream clients for the recap Telegram bot: the
//! transcript cache, per-chat conversation sessions, the Groq text-generation
//! client and YouTube transcript fetching.

pub mod cache;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
pub mod transcript;

// Re-export commonly used types
pub use cache::{CacheEntry, CacheStats, TranscriptCache};
pub use config::Config;
pub use error::{RecapError, RecapResult, TranscriptError};
pub use llm::{GenerateText, Language, LlmClient};
pub use session::{ChatRole, ChatTurn, Session, SessionStore};
pub use transcript::{FetchTranscript, YouTubeTranscriptClient};
