//! Shared transcript cache.
//!
//! Caching is keyed by video id, not by chat: if ten users send the same
//! link, the transcript is fetched from YouTube once and the summary is
//! generated once. Entries expire 24 hours after creation and the store
//! holds at most 200 videos, evicting the least recently used entry under
//! insertion pressure.
//!
//! The cache is in-memory only and cleared on restart; transcripts are cheap
//! to re-fetch.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};


/// Default time to live for cached transcripts.
pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
/// Default maximum number of cached videos.
pub const DEFAULT_CAPACITY: usize = 200;

/// A cached transcript together with its lazily generated summary.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Full transcript text.
    pub transcript: String,
    /// Language code reported by the transcript source.
    pub language_code: String,
    /// Canonical English summary, attached on first generation. Translations
    /// are per-chat and never stored here.
    pub summary: Option<String>,
    pub created_at: Instant,
    pub last_accessed: Instant,
    /// Number of successful lookups of this entry.
    pub access_count: u64,
}

impl CacheEntry {
    fn new(transcript: String, language_code: String) -> Self {
        let now = Instant::now();
        Self {
            transcript,
            language_code,
            summary: None,
            created_at: now,
            last_accessed: now,
            access_count: 0,
        }
    }

    /// Whether the entry has outlived `ttl` at `now`. Shared by lookups and
    /// the maintenance pass so the two cannot disagree on policy.
    fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        now.duration_since(self.created_at) > ttl
    }

    fn touch(&mut self) {
        self.last_accessed = Instant::now();
        self.access_count += 1;
    }
}

/// Cache statistics, for logging and debugging only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Live (non-expired) entries.
    pub entries: usize,
    pub capacity: usize,
    pub ttl: Duration,
    /// Total lookup hits across live entries.
    pub total_hits: u64,
}

/// TTL + LRU cache for video transcripts, shared by all conversations.
///
/// All operations take the store lock for their whole duration, so each is
/// atomic with respect to interleaved conversation flows. None of them
/// suspends; network calls happen in the orchestration layer between store
/// calls.
#[derive(Debug)]
pub struct TranscriptCache {
    inner: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    capacity: usize,
}

impl TranscriptCache {
    pub fn new(ttl: Duration, capacity: usize) -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
            ttl,
            capacity,
        }
    }

    /// Cached entry for `video_id`, if present and alive.
    ///
    /// A hit refreshes `last_accessed` and bumps `access_count` before the
    /// snapshot is returned. An expired entry is removed and reported as a
    /// miss.
    pub fn get(&self, video_id: &str) -> Option<CacheEntry> {
        let mut store = self.inner.lock();
        let now = Instant::now();
        if store
            .get(video_id)
            .is_some_and(|entry| entry.is_expired(self.ttl, now))
        {
            store.remove(video_id);
            return None;
        }
        let entry = store.get_mut(video_id)?;
        entry.touch();
        Some(entry.clone())
    }

    /// Cache a transcript, replacing any previous entry for the same video.
    ///
    /// Runs the maintenance pass first: expired entries are swept, then one
    /// LRU eviction if the store is still at capacity.
    pub fn insert(&self, video_id: &str, transcript: &str, language_code: &str) -> CacheEntry {
        let mut store = self.inner.lock();
        Self::maintain(&mut store, self.ttl, self.capacity);
        let entry = CacheEntry::new(transcript.to_string(), language_code.to_string());
        store.insert(video_id.to_string(), entry.clone());
        entry
    }

    /// Attach a generated summary to an existing entry.
    ///
    /// First writer wins: an already-attached summary is kept. An absent
    /// entry is ignored rather than treated as an error.
    pub fn attach_summary(&self, video_id: &str, summary: &str) {
        let mut store = self.inner.lock();
        if let Some(entry) = store.get_mut(video_id) {
            if entry.summary.is_none() {
                entry.summary = Some(summary.to_string());
            }
        }
    }

    pub fn stats(&self) -> CacheStats {
        let store = self.inner.lock();
        let now = Instant::now();
        let (entries, total_hits) = store
            .values()
            .filter(|entry| !entry.is_expired(self.ttl, now))
            .fold((0, 0), |(count, hits), entry| {
                (count + 1, hits + entry.access_count)
            });
        CacheStats {
            entries,
            capacity: self.capacity,
            ttl: self.ttl,
            total_hits,
        }
    }

    /// TTL sweep first (stale entries go regardless of how hot they are),
    /// then a single LRU eviction if the store is still full. Keeps memory
    /// bounded while protecting recently used entries from one-at-a-time
    /// insertion pressure.
    fn maintain(store: &mut HashMap<String, CacheEntry>, ttl: Duration, capacity: usize) {
        let now = Instant::now();
        store.retain(|_, entry| !entry.is_expired(ttl, now));

        if store.len() >= capacity {
            let lru = store
                .iter()
                .min_by_key(|(_, entry)| entry.last_accessed)
                .map(|(video_id, _)| video_id.clone());
            if let Some(video_id) = lru {
                store.remove(&video_id);
            }
        }
    }
}

impl Default for TranscriptCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}
