//! Groq chat client with retry and model fallback.

use super::language::Language;
use super::messages::{ChatMessage, ChatRequest, ChatResponse};
use super::prompts;
use crate::error::{RecapError, RecapResult};
use crate::session::ChatTurn;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

const API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Attempts per model before moving on to the fallback.
const MAX_ATTEMPTS: u32 = 3;
/// Fixed wait between attempts when rate limited.
const RETRY_BACKOFF: Duration = Duration::from_secs(15);

const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 2048;

/// Text generation seam.
///
/// [`LlmClient`] is the production implementation; tests substitute fakes.
/// The high-level operations are provided methods so every implementation
/// shares the same prompts.
#[async_trait]
pub trait GenerateText: Send + Sync {
    /// One system-plus-user exchange returning the generated text.
    async fn ask(&self, system: &str, user: &str) -> RecapResult<String>;

    /// Summarize a full transcript in the given language.
    async fn summarize(&self, transcript: &str, language: Language) -> RecapResult<String> {
        self.ask(
            &prompts::summary_system(language),
            &prompts::summary_user(transcript),
        )
        .await
    }

    /// Translate an existing summary. Much cheaper than re-summarizing.
    async fn translate_summary(&self, summary: &str, language: Language) -> RecapResult<String> {
        self.ask(&prompts::translation_system(language), summary).await
    }

    /// Answer a question strictly grounded in the transcript, replaying
    /// recent conversation turns for context.
    async fn answer_question(
        &self,
        transcript: &str,
        history: &[ChatTurn],
        question: &str,
        language: Language,
    ) -> RecapResult<String> {
        self.ask(
            &prompts::qa_system(language),
            &prompts::qa_user(transcript, history, question),
        )
        .await
    }

    /// Detailed analytical breakdown of the video.
    async fn deep_dive(&self, transcript: &str, language: Language) -> RecapResult<String> {
        self.ask(
            &prompts::deep_dive_system(language),
            &prompts::analysis_user(transcript),
        )
        .await
    }

    /// Actionable recommendations extracted from the video.
    async fn action_points(&self, transcript: &str, language: Language) -> RecapResult<String> {
        self.ask(
            &prompts::action_points_system(language),
            &prompts::analysis_user(transcript),
        )
        .await
    }
}

/// Client for Groq's OpenAI-compatible chat completions API.
pub struct LlmClient {
    http: Client,
    api_key: String,
    model: String,
    fallback_model: String,
}

impl LlmClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        fallback_model: impl Into<String>,
    ) -> RecapResult<Self> {
        let http = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| RecapError::llm(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            fallback_model: fallback_model.into(),
        })
    }

    /// One request against a specific model, no retries.
    async fn request(&self, model: &str, messages: &[ChatMessage]) -> RecapResult<String> {
        let request = ChatRequest {
            model: model.to_string(),
            messages: messages.to_vec(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let response = self
            .http
            .post(API_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RecapError::llm_with_model(format!("request failed: {e}"), model))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RecapError::llm_with_model(
                format!("HTTP {status}: {body}"),
                model,
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| RecapError::llm_with_model(format!("malformed response: {e}"), model))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RecapError::llm_with_model("response had no choices", model))?;

        Ok(content.trim().to_string())
    }

    /// Walk the primary and fallback models. Within each model, transient
    /// rate limits are retried with a fixed backoff; a daily-quota condition
    /// skips straight to the next model; anything else surfaces immediately.
    async fn ask_with_fallback(&self, system: &str, user: &str) -> RecapResult<String> {
        let messages = vec![ChatMessage::system(system), ChatMessage::user(user)];
        let mut last_error = None;

        for model in [self.model.as_str(), self.fallback_model.as_str()] {
            for attempt in 1..=MAX_ATTEMPTS {
                match self.request(model, &messages).await {
                    Ok(text) => {
                        if attempt > 1 {
                            debug!(model, attempt, "request succeeded after retry");
                        }
                        return Ok(text);
                    }
                    Err(error) => {
                        if error.is_daily_quota() {
                            warn!(model, "daily token quota reached, trying next model");
                            last_error = Some(error);
                            break;
                        }
                        if !error.is_retryable() {
                            return Err(error);
                        }
                        if attempt < MAX_ATTEMPTS {
                            warn!(
                                model,
                                attempt,
                                delay_secs = RETRY_BACKOFF.as_secs(),
                                "rate limited, retrying"
                            );
                            sleep(RETRY_BACKOFF).await;
                        } else {
                            warn!(model, "rate limited after {MAX_ATTEMPTS} attempts");
                        }
                        last_error = Some(error);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            RecapError::llm("All models are rate limited. Please wait a while and try again.")
        }))
    }
}

#[async_trait]
impl GenerateText for LlmClient {
    async fn ask(&self, system: &str, user: &str) -> RecapResult<String> {
        self.ask_with_fallback(system, user).await
    }
}
