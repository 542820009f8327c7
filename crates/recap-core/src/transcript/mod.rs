//! YouTube transcript fetching.
//!
//! Handlers depend on the [`FetchTranscript`] seam; the real implementation
//! talks to YouTube's innertube API. Fetch failures are never cached.

pub mod url;
mod youtube;

pub use youtube::YouTubeTranscriptClient;

use crate::error::RecapResult;
use async_trait::async_trait;

/// Content fetch seam.
#[async_trait]
pub trait FetchTranscript: Send + Sync {
    /// Full transcript text and its language code for a video.
    async fn fetch(&self, video_id: &str) -> RecapResult<(String, String)>;
}
