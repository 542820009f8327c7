//! Text generation through Groq's OpenAI-compatible API.
//!
//! The high-level operations (summarize, translate, grounded Q&A, deep dive,
//! action points) live on the [`GenerateText`] trait so handlers can run
//! against a fake backend in tests; [`LlmClient`] is the real implementation
//! with retry and model fallback.

pub mod client;
pub mod language;
pub mod messages;
pub mod prompts;

pub use client::{GenerateText, LlmClient};
pub use language::Language;
pub use messages::{ChatMessage, MessageRole};
