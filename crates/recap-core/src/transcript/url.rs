//! Video id extraction from YouTube URLs.

use once_cell::sync::Lazy;
use regex::Regex;

// Matches all common YouTube URL forms: watch, short link, shorts, embed.
static YOUTUBE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:https?://)?(?:www\.)?(?:youtube\.com/(?:watch\?(?:.*&)?v=|shorts/|embed/|v/)|youtu\.be/)([a-zA-Z0-9_-]{11})",
    )
    .expect("YouTube URL pattern is valid")
});

/// The 11-character video id from a YouTube URL anywhere in `text`, or
/// `None` if no recognizable URL is present.
pub fn extract_video_id(text: &str) -> Option<&str> {
    YOUTUBE_URL
        .captures(text)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Whether `text` contains a recognizable YouTube URL.
pub fn is_youtube_url(text: &str) -> bool {
    extract_video_id(text).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_watch_urls() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtube.com/watch?list=PL123&v=dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_from_short_links() {
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("youtu.be/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_from_shorts_and_embeds() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/shorts/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn extracts_from_surrounding_text() {
        assert_eq!(
            extract_video_id("summarize https://youtu.be/dQw4w9WgXcQ in hindi"),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn rejects_non_youtube_text() {
        assert!(!is_youtube_url("what is this video about?"));
        assert!(!is_youtube_url("https://vimeo.com/123456789"));
    }
}
