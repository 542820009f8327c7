//! YouTube link handling: fetch or reuse the transcript, summarize, and bind
//! the video to the chat's session.

use super::{user_error_text, Services};
use recap_core::transcript::url;
use recap_core::{Language, RecapResult};
use tracing::{debug, info};

pub async fn handle_link(services: &Services, chat_id: i64, text: &str) -> RecapResult<()> {
    // A language named in the same message wins for this request and is
    // persisted afterwards.
    let requested = Language::detect(text);
    let language = requested.unwrap_or_else(|| services.sessions.get_or_create(chat_id).language);

    let Some(video_id) = url::extract_video_id(text) else {
        services
            .telegram
            .try_send(chat_id, "❌ Couldn't parse that YouTube link. Please try again.")
            .await;
        return Ok(());
    };

    let session = services.sessions.get_or_create(chat_id);
    if session.video_id.as_deref() == Some(video_id) && session.has_video() {
        services
            .telegram
            .try_send(
                chat_id,
                "ℹ️ This video is already loaded. Ask me anything about it, or /summary to see the summary again.",
            )
            .await;
        return Ok(());
    }

    let placeholder = services.telegram.try_send(chat_id, "⏳ Processing video…").await;

    // Fetch-or-reuse. The miss path is check-then-fetch-then-insert without
    // a per-key lock: two concurrent first requests for the same video may
    // both fetch, and the second insert replaces the first entry (last
    // writer wins).
    let (transcript, cached_summary, cache_hit) = match services.cache.get(video_id) {
        Some(entry) => {
            debug!(video_id, hits = entry.access_count, "transcript cache hit");
            (entry.transcript, entry.summary, true)
        }
        None => {
            let (transcript, language_code) = match services.fetcher.fetch(video_id).await {
                Ok(fetched) => fetched,
                Err(error) => {
                    services
                        .telegram
                        .deliver(chat_id, placeholder, &user_error_text(&error))
                        .await;
                    return Ok(());
                }
            };
            services.cache.insert(video_id, &transcript, &language_code);
            info!(video_id, language_code, "transcript fetched and cached");
            (transcript, None, false)
        }
    };

    if let Some(target) = placeholder {
        let words = transcript.split_whitespace().count();
        let status = if cache_hit {
            format!("✅ Transcript ready ({words} words, cached). Summarizing…")
        } else {
            format!("✅ Transcript fetched ({words} words). Summarizing…")
        };
        services.telegram.try_edit(target, &status).await;
    }

    // A cached canonical (English) summary is reused directly for English
    // and translated for other languages; otherwise summarize from scratch
    // and attach the result to the cache only when it is the canonical
    // language.
    let summary = match cached_summary {
        Some(cached) if language == Language::English => Ok(cached),
        Some(cached) => services.llm.translate_summary(&cached, language).await,
        None => {
            let generated = services.llm.summarize(&transcript, language).await;
            if let Ok(summary) = &generated {
                if language == Language::English {
                    services.cache.attach_summary(video_id, summary);
                }
            }
            generated
        }
    };

    let summary = match summary {
        Ok(summary) => summary,
        Err(error) => {
            let message = format!("❌ Failed to generate summary: {error}");
            services.telegram.deliver(chat_id, placeholder, &message).await;
            return Ok(());
        }
    };

    // New video: content and summary land together, the Q&A history resets.
    services
        .sessions
        .load_video(chat_id, video_id, &transcript, &summary);
    if let Some(language) = requested {
        services.sessions.set_language(chat_id, language);
    }

    services.telegram.deliver(chat_id, placeholder, &summary).await;
    services
        .telegram
        .try_send(chat_id, "💬 Ask me anything about this video!")
        .await;
    Ok(())
}
