//! Transcript retrieval through YouTube's innertube API.
//!
//! Two requests per video: the `player` endpoint lists the available caption
//! tracks, then the selected track is fetched in `json3` format and its
//! segments joined into one plain-text transcript.

use super::FetchTranscript;
use crate::error::{RecapResult, TranscriptError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const CLIENT_NAME: &str = "ANDROID";
const CLIENT_VERSION: &str = "20.10.38";

pub struct YouTubeTranscriptClient {
    http: Client,
}

impl YouTubeTranscriptClient {
    pub fn new() -> RecapResult<Self> {
        let http = Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| TranscriptError::Fetch {
                message: format!("failed to create HTTP client: {e}"),
            })?;
        Ok(Self { http })
    }

    async fn player_response(&self, video_id: &str) -> Result<PlayerResponse, TranscriptError> {
        let body = json!({
            "videoId": video_id,
            "context": {
                "client": {
                    "clientName": CLIENT_NAME,
                    "clientVersion": CLIENT_VERSION,
                }
            }
        });

        let response = self
            .http
            .post(PLAYER_URL)
            .json(&body)
            .send()
            .await
            .map_err(|e| TranscriptError::Fetch {
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptError::Fetch {
                message: format!("player endpoint returned HTTP {status}"),
            });
        }

        response.json().await.map_err(|e| TranscriptError::Fetch {
            message: format!("malformed player response: {e}"),
        })
    }

    async fn fetch_track(&self, track: &CaptionTrack) -> Result<String, TranscriptError> {
        let url = format!("{}&fmt=json3", track.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| TranscriptError::Fetch {
                message: e.to_string(),
            })?;

        let body: TranscriptBody =
            response.json().await.map_err(|e| TranscriptError::Fetch {
                message: format!("malformed transcript body: {e}"),
            })?;

        Ok(join_events(&body))
    }
}

#[async_trait]
impl FetchTranscript for YouTubeTranscriptClient {
    async fn fetch(&self, video_id: &str) -> RecapResult<(String, String)> {
        let player = self.player_response(video_id).await?;

        if let Some(status) = player
            .playability_status
            .as_ref()
            .and_then(|s| s.status.as_deref())
        {
            if status == "ERROR" || status == "LOGIN_REQUIRED" {
                return Err(TranscriptError::VideoUnavailable.into());
            }
        }

        let tracks = player
            .captions
            .and_then(|captions| captions.player_captions_tracklist_renderer)
            .and_then(|renderer| renderer.caption_tracks)
            .unwrap_or_default();

        if tracks.is_empty() {
            return Err(TranscriptError::CaptionsDisabled.into());
        }

        let track = select_track(&tracks).ok_or(TranscriptError::NotFound)?;
        debug!(
            video_id,
            language = %track.language_code,
            generated = track.is_generated(),
            "selected caption track"
        );

        let text = self.fetch_track(track).await?;
        if text.is_empty() {
            return Err(TranscriptError::NotFound.into());
        }

        Ok((text, track.language_code.clone()))
    }
}

/// Track selection priority: English first, then any manually created
/// track, then any auto-generated one.
fn select_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    tracks
        .iter()
        .find(|track| track.language_code.starts_with("en") && !track.is_generated())
        .or_else(|| {
            tracks
                .iter()
                .find(|track| track.language_code.starts_with("en"))
        })
        .or_else(|| tracks.iter().find(|track| !track.is_generated()))
        .or_else(|| tracks.first())
}

/// Join every caption segment into one whitespace-normalized string.
fn join_events(body: &TranscriptBody) -> String {
    let mut words = Vec::new();
    for event in body.events.iter().flatten() {
        for seg in event.segs.iter().flatten() {
            if let Some(text) = &seg.utf8 {
                words.extend(text.split_whitespace().map(str::to_string));
            }
        }
    }
    words.join(" ")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayabilityStatus {
    status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    /// `"asr"` marks auto-generated tracks.
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptBody {
    events: Option<Vec<TranscriptEvent>>,
}

#[derive(Debug, Deserialize)]
struct TranscriptEvent {
    segs: Option<Vec<TranscriptSeg>>,
}

#[derive(Debug, Deserialize)]
struct TranscriptSeg {
    utf8: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(language_code: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.invalid/{language_code}"),
            language_code: language_code.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn prefers_manual_english() {
        let tracks = vec![
            track("de", None),
            track("en", Some("asr")),
            track("en", None),
        ];
        let selected = select_track(&tracks).unwrap();
        assert_eq!(selected.language_code, "en");
        assert!(!selected.is_generated());
    }

    #[test]
    fn falls_back_to_generated_english_then_manual_other() {
        let tracks = vec![track("de", None), track("en", Some("asr"))];
        assert_eq!(select_track(&tracks).unwrap().language_code, "en");

        let tracks = vec![track("fr", Some("asr")), track("de", None)];
        assert_eq!(select_track(&tracks).unwrap().language_code, "de");
    }

    #[test]
    fn takes_anything_over_nothing() {
        let tracks = vec![track("ja", Some("asr"))];
        assert_eq!(select_track(&tracks).unwrap().language_code, "ja");
        assert!(select_track(&[]).is_none());
    }

    #[test]
    fn join_events_flattens_segments() {
        let body: TranscriptBody = serde_json::from_str(
            r#"{"events":[
                {"segs":[{"utf8":"hello "},{"utf8":"world"}]},
                {"segs":null},
                {"segs":[{"utf8":"\nagain"}]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(join_events(&body), "hello world again");
    }
}
