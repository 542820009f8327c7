//! Per-chat conversation sessions.
//!
//! One session per Telegram chat id, holding the currently loaded video,
//! the summary last shown to that chat, the preferred response language and
//! a bounded Q&A history. Sessions expire lazily after two hours of
//! inactivity; a periodic sweep additionally removes expired sessions so
//! memory stays bounded even for chats that never come back.

use crate::llm::Language;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};


/// Default inactivity window before a session is discarded.
pub const DEFAULT_TTL: Duration = Duration::from_secs(2 * 60 * 60);
/// Default number of Q&A turns kept per session.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

/// One Q&A turn, kept so follow-up questions have context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
}

impl ChatTurn {
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// State for one chat.
#[derive(Debug, Clone)]
pub struct Session {
    /// Video currently loaded, if any.
    pub video_id: Option<String>,
    /// Transcript bound to this chat; a working copy of the cache's entry,
    /// valid for the session's own lifetime.
    pub transcript: Option<String>,
    /// Latest summary shown to this chat. May be a translation and so differ
    /// from the cache's canonical summary.
    pub summary: Option<String>,
    /// Preferred response language; persists until changed.
    pub language: Language,
    /// Bounded Q&A history, oldest first.
    pub history: Vec<ChatTurn>,
    pub created_at: Instant,
    pub last_active: Instant,
}

impl Session {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            video_id: None,
            transcript: None,
            summary: None,
            language: Language::default(),
            history: Vec::new(),
            created_at: now,
            last_active: now,
        }
    }

    /// Whether the session has been inactive longer than `ttl` at `now`.
    /// Shared by per-access expiry and the periodic sweep.
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.last_active) > ttl
    }

    /// Whether a video is currently loaded.
    pub fn has_video(&self) -> bool {
        self.transcript.is_some()
    }
}

/// In-memory session store keyed by chat id.
///
/// Every operation takes the store lock for its whole duration, so
/// multi-field updates such as [`SessionStore::load_video`] are atomic with
/// respect to interleaved conversation flows: a reader never observes a new
/// video paired with a stale history.
#[derive(Debug)]
pub struct SessionStore {
    inner: Mutex<HashMap<i64, Session>>,
    ttl: Duration,
    history_limit: usize,
}

impl SessionStore {
    pub fn new(ttl: Duration, history_limit: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
            history_limit,
        }
    }

    /// Snapshot of the live session for `chat_id`.
    ///
    /// Expiry is judged first: an expired session is replaced with a fresh
    /// empty one, otherwise `last_active` is refreshed. A chat never seen
    /// before gets a fresh session.
    pub fn get_or_create(&self, chat_id: i64) -> Session {
        let mut store = self.inner.lock();
        let now = Instant::now();
        let session = store.entry(chat_id).or_insert_with(Session::new);
        if session.is_expired(self.ttl, now) {
            *session = Session::new();
        } else {
            session.last_active = now;
        }
        session.clone()
    }

    /// Bind a new video to the chat as one atomic update: content fields are
    /// replaced and the Q&A history cleared together. The language
    /// preference survives.
    pub fn load_video(&self, chat_id: i64, video_id: &str, transcript: &str, summary: &str) {
        let mut store = self.inner.lock();
        let session = Self::live_entry(&mut store, chat_id, self.ttl);
        *session = Session {
            video_id: Some(video_id.to_string()),
            transcript: Some(transcript.to_string()),
            summary: Some(summary.to_string()),
            language: session.language,
            history: Vec::new(),
            created_at: session.created_at,
            last_active: Instant::now(),
        };
    }

    /// Update the preferred response language.
    pub fn set_language(&self, chat_id: i64, language: Language) {
        let mut store = self.inner.lock();
        let session = Self::live_entry(&mut store, chat_id, self.ttl);
        session.language = language;
        session.last_active = Instant::now();
    }

    /// Replace the summary shown to this chat, e.g. after translation.
    pub fn set_summary(&self, chat_id: i64, summary: &str) {
        let mut store = self.inner.lock();
        let session = Self::live_entry(&mut store, chat_id, self.ttl);
        session.summary = Some(summary.to_string());
        session.last_active = Instant::now();
    }

    /// Append one Q&A turn, dropping from the front once the history exceeds
    /// the configured bound.
    pub fn append_turn(&self, chat_id: i64, role: ChatRole, content: &str) {
        let mut store = self.inner.lock();
        let session = Self::live_entry(&mut store, chat_id, self.ttl);
        session.history.push(ChatTurn::new(role, content));
        let excess = session.history.len().saturating_sub(self.history_limit);
        if excess > 0 {
            session.history.drain(..excess);
        }
        session.last_active = Instant::now();
    }

    /// Whether the chat currently has a video loaded. Expired sessions
    /// report false.
    pub fn has_video(&self, chat_id: i64) -> bool {
        let store = self.inner.lock();
        let now = Instant::now();
        store
            .get(&chat_id)
            .is_some_and(|session| !session.is_expired(self.ttl, now) && session.has_video())
    }

    /// Reset the chat to a fresh, empty session.
    pub fn reset(&self, chat_id: i64) {
        let mut store = self.inner.lock();
        store.insert(chat_id, Session::new());
    }

    /// Remove every session expired at the time of the call; returns how
    /// many were removed. Run periodically by the maintenance task.
    pub fn sweep_expired(&self) -> usize {
        let mut store = self.inner.lock();
        let now = Instant::now();
        let before = store.len();
        store.retain(|_, session| !session.is_expired(self.ttl, now));
        before - store.len()
    }

    /// Number of sessions not currently expired.
    pub fn count_active(&self) -> usize {
        let store = self.inner.lock();
        let now = Instant::now();
        store
            .values()
            .filter(|session| !session.is_expired(self.ttl, now))
            .count()
    }

    /// Live mutable session for `chat_id`. An expired session is replaced
    /// before any mutation so no update lands on stale state.
    fn live_entry(store: &mut HashMap<i64, Session>, chat_id: i64, ttl: Duration) -> &mut Session {
        let now = Instant::now();
        let session = store.entry(chat_id).or_insert_with(Session::new);
        if session.is_expired(ttl, now) {
            *session = Session::new();
        }
        session
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_HISTORY_LIMIT)
    }
}
