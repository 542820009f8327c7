//! Handler flow tests against fake transport, fetcher and generation
//! backends.

use super::*;
use crate::telegram::{SentMessage, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use recap_core::{RecapError, SessionStore, TranscriptCache, TranscriptError};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::Arc;

const CHAT: i64 = 7;
const VIDEO_URL: &str = "https://www.youtube.com/watch?v=abc12345678";
const VIDEO_ID: &str = "abc12345678";

/// Records every outbound message; edits replace the recorded text.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(i64, String)>>,
    next_id: AtomicI64,
}

impl RecordingTransport {
    fn texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, text)| text.clone()).collect()
    }

    fn contains(&self, needle: &str) -> bool {
        self.texts().iter().any(|text| text.contains(needle))
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, chat_id: i64, text: &str) -> recap_core::RecapResult<SentMessage> {
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().push((message_id, text.to_string()));
        Ok(SentMessage { chat_id, message_id })
    }

    async fn edit(&self, target: SentMessage, text: &str) -> recap_core::RecapResult<()> {
        let mut sent = self.sent.lock();
        if let Some(entry) = sent.iter_mut().find(|(id, _)| *id == target.message_id) {
            entry.1 = text.to_string();
        }
        Ok(())
    }
}

/// Serves a fixed transcript and counts fetches.
struct FakeFetcher {
    transcript: String,
    fetches: AtomicUsize,
    fail_with: Option<TranscriptError>,
}

impl FakeFetcher {
    fn returning(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            fetches: AtomicUsize::new(0),
            fail_with: None,
        }
    }

    fn failing(error: TranscriptError) -> Self {
        Self {
            transcript: String::new(),
            fetches: AtomicUsize::new(0),
            fail_with: Some(error),
        }
    }

    fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl recap_core::FetchTranscript for FakeFetcher {
    async fn fetch(&self, _video_id: &str) -> recap_core::RecapResult<(String, String)> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.fail_with {
            Some(error) => Err(RecapError::from(error.clone())),
            None => Ok((self.transcript.clone(), "en".to_string())),
        }
    }
}

/// Echoes the system prompt family so tests can tell which operation ran.
struct FakeLlm;

#[async_trait]
impl recap_core::GenerateText for FakeLlm {
    async fn ask(&self, system: &str, _user: &str) -> recap_core::RecapResult<String> {
        if system.contains("translator") {
            Ok("translated summary".to_string())
        } else if system.contains("video assistant") {
            Ok("grounded answer".to_string())
        } else {
            Ok("generated summary".to_string())
        }
    }
}

struct Fixture {
    services: Services,
    transport: Arc<RecordingTransport>,
    fetcher: Arc<FakeFetcher>,
}

fn fixture(fetcher: FakeFetcher) -> Fixture {
    let transport = Arc::new(RecordingTransport::default());
    let fetcher = Arc::new(fetcher);
    let services = Services {
        telegram: transport.clone(),
        cache: Arc::new(TranscriptCache::default()),
        sessions: Arc::new(SessionStore::default()),
        llm: Arc::new(FakeLlm),
        fetcher: fetcher.clone(),
    };
    Fixture {
        services,
        transport,
        fetcher,
    }
}

#[tokio::test]
async fn link_fetches_caches_and_loads_session() {
    let fx = fixture(FakeFetcher::returning("the transcript text"));

    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();

    assert_eq!(fx.fetcher.fetch_count(), 1);

    let entry = fx.services.cache.get(VIDEO_ID).expect("cached");
    assert_eq!(entry.transcript, "the transcript text");
    assert_eq!(
        entry.summary.as_deref(),
        Some("generated summary"),
        "canonical English summary attached to the cache"
    );

    let session = fx.services.sessions.get_or_create(CHAT);
    assert_eq!(session.video_id.as_deref(), Some(VIDEO_ID));
    assert_eq!(session.summary.as_deref(), Some("generated summary"));
    assert!(session.history.is_empty());

    assert!(fx.transport.contains("generated summary"));
    assert!(fx.transport.contains("Ask me anything"));
}

#[tokio::test]
async fn second_chat_reuses_cached_transcript_and_summary() {
    let fx = fixture(FakeFetcher::returning("the transcript text"));

    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();
    dispatch(&fx.services, CHAT + 1, VIDEO_URL, None).await.unwrap();

    assert_eq!(fx.fetcher.fetch_count(), 1, "second chat hits the cache");
    let session = fx.services.sessions.get_or_create(CHAT + 1);
    assert_eq!(session.summary.as_deref(), Some("generated summary"));
}

#[tokio::test]
async fn resending_the_loaded_video_short_circuits() {
    let fx = fixture(FakeFetcher::returning("the transcript text"));

    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();
    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();

    assert_eq!(fx.fetcher.fetch_count(), 1);
    assert!(fx.transport.contains("already loaded"));
}

#[tokio::test]
async fn fetch_failure_reports_user_message_and_caches_nothing() {
    let fx = fixture(FakeFetcher::failing(TranscriptError::CaptionsDisabled));

    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();

    assert!(fx.transport.contains("Transcripts are disabled"));
    assert!(fx.services.cache.get(VIDEO_ID).is_none(), "failures are not cached");
    assert!(!fx.services.sessions.has_video(CHAT));
}

#[tokio::test]
async fn link_with_language_keyword_translates_nothing_but_persists_language() {
    let fx = fixture(FakeFetcher::returning("the transcript text"));

    dispatch(&fx.services, CHAT, &format!("{VIDEO_URL} in hindi"), None)
        .await
        .unwrap();

    let session = fx.services.sessions.get_or_create(CHAT);
    assert_eq!(session.language, recap_core::Language::Hindi);
    // The summary was generated directly in Hindi, so the cache keeps no
    // canonical English summary.
    let entry = fx.services.cache.get(VIDEO_ID).unwrap();
    assert!(entry.summary.is_none());
}

#[tokio::test]
async fn question_without_video_sends_onboarding_hint() {
    let fx = fixture(FakeFetcher::returning(""));

    dispatch(&fx.services, CHAT, "what is this about?", None)
        .await
        .unwrap();

    assert!(fx.transport.contains("Send me a YouTube link"));
    assert!(fx.services.sessions.get_or_create(CHAT).history.is_empty());
}

#[tokio::test]
async fn question_appends_both_turns() {
    let fx = fixture(FakeFetcher::returning("the transcript text"));
    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();

    dispatch(&fx.services, CHAT, "what is discussed?", None)
        .await
        .unwrap();

    let history = fx.services.sessions.get_or_create(CHAT).history;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, recap_core::ChatRole::User);
    assert_eq!(history[0].content, "what is discussed?");
    assert_eq!(history[1].role, recap_core::ChatRole::Assistant);
    assert_eq!(history[1].content, "grounded answer");
    assert!(fx.transport.contains("grounded answer"));
}

#[tokio::test]
async fn language_switch_translates_current_summary() {
    let fx = fixture(FakeFetcher::returning("the transcript text"));
    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();

    dispatch(&fx.services, CHAT, "tamil please", None).await.unwrap();

    let session = fx.services.sessions.get_or_create(CHAT);
    assert_eq!(session.language, recap_core::Language::Tamil);
    assert_eq!(session.summary.as_deref(), Some("translated summary"));
    // The cache's canonical summary is untouched by translation.
    let entry = fx.services.cache.get(VIDEO_ID).unwrap();
    assert_eq!(entry.summary.as_deref(), Some("generated summary"));
}

#[tokio::test]
async fn language_switch_without_video_just_sets_language() {
    let fx = fixture(FakeFetcher::returning(""));

    dispatch(&fx.services, CHAT, "switch to kannada", None)
        .await
        .unwrap();

    assert_eq!(
        fx.services.sessions.get_or_create(CHAT).language,
        recap_core::Language::Kannada
    );
    assert!(fx.transport.contains("Language set to"));
}

#[tokio::test]
async fn reset_command_clears_the_session() {
    let fx = fixture(FakeFetcher::returning("the transcript text"));
    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();

    dispatch(&fx.services, CHAT, "/reset", None).await.unwrap();

    assert!(!fx.services.sessions.has_video(CHAT));
    assert!(fx.transport.contains("Session cleared"));
}

#[tokio::test]
async fn summary_command_replays_last_summary() {
    let fx = fixture(FakeFetcher::returning("the transcript text"));
    dispatch(&fx.services, CHAT, VIDEO_URL, None).await.unwrap();

    dispatch(&fx.services, CHAT, "/summary", None).await.unwrap();

    let texts = fx.transport.texts();
    assert!(texts.iter().filter(|t| t.contains("generated summary")).count() >= 2);
}

#[tokio::test]
async fn start_command_greets_by_name() {
    let fx = fixture(FakeFetcher::returning(""));

    dispatch(&fx.services, CHAT, "/start", Some("Ada")).await.unwrap();

    assert!(fx.transport.contains("Hi *Ada*"));
}
