//! Q&A and language switching for non-URL text messages.

use super::Services;
use recap_core::{ChatRole, Language, RecapResult};

pub async fn handle_question(services: &Services, chat_id: i64, question: &str) -> RecapResult<()> {
    if let Some(language) = Language::detect(question) {
        return switch_language(services, chat_id, language).await;
    }

    if !services.sessions.has_video(chat_id) {
        services
            .telegram
            .try_send(
                chat_id,
                "👋 Send me a YouTube link and I'll summarize it for you!\nThen you can ask me anything about the video.",
            )
            .await;
        return Ok(());
    }

    let placeholder = services.telegram.try_send(chat_id, "🤔 …").await;

    let session = services.sessions.get_or_create(chat_id);
    let transcript = session.transcript.unwrap_or_default();
    let answer = services
        .llm
        .answer_question(&transcript, &session.history, question, session.language)
        .await;

    match answer {
        Ok(answer) => {
            services.sessions.append_turn(chat_id, ChatRole::User, question);
            services
                .sessions
                .append_turn(chat_id, ChatRole::Assistant, &answer);
            services.telegram.deliver(chat_id, placeholder, &answer).await;
        }
        Err(error) => {
            let message = format!("❌ Error: {error}");
            services.telegram.deliver(chat_id, placeholder, &message).await;
        }
    }
    Ok(())
}

/// Persist the new language and, when a summary is on screen, re-deliver it
/// translated. Translation reuses the session's current summary instead of
/// re-summarizing.
async fn switch_language(
    services: &Services,
    chat_id: i64,
    language: Language,
) -> RecapResult<()> {
    services.sessions.set_language(chat_id, language);

    let summary = services.sessions.get_or_create(chat_id).summary;
    let Some(summary) = summary else {
        services
            .telegram
            .try_send(
                chat_id,
                &format!("✅ Language set to *{language}*. Send a YouTube link to get started!"),
            )
            .await;
        return Ok(());
    };

    let placeholder = services
        .telegram
        .try_send(chat_id, &format!("🌐 Translating to {language}…"))
        .await;

    match services.llm.translate_summary(&summary, language).await {
        Ok(translated) => {
            services.sessions.set_summary(chat_id, &translated);
            services
                .telegram
                .deliver(chat_id, placeholder, &translated)
                .await;
        }
        Err(error) => {
            let message = format!("❌ Translation failed: {error}");
            services.telegram.deliver(chat_id, placeholder, &message).await;
        }
    }
    Ok(())
}
