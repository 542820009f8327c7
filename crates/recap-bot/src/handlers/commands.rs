//! Slash command handling.

use super::Services;
use crate::telegram::SentMessage;
use recap_core::RecapResult;

const NO_VIDEO: &str = "📹 No video loaded yet. Send me a YouTube link first!";

async fn deliver_result(
    services: &Services,
    chat_id: i64,
    placeholder: Option<SentMessage>,
    result: RecapResult<String>,
) {
    match result {
        Ok(text) => services.telegram.deliver(chat_id, placeholder, &text).await,
        Err(error) => {
            let message = format!("❌ Error: {error}");
            services.telegram.deliver(chat_id, placeholder, &message).await;
        }
    }
}

pub async fn handle_command(
    services: &Services,
    chat_id: i64,
    text: &str,
    first_name: Option<&str>,
) -> RecapResult<()> {
    let command = text.split_whitespace().next().unwrap_or(text);
    // Group chats address commands as /cmd@BotName.
    let command = command.split('@').next().unwrap_or(command);

    match command {
        "/start" | "/help" => {
            let name = first_name.unwrap_or("there");
            let welcome = format!(
                "👋 Hi *{name}*! I'm your YouTube Research Assistant.\n\n\
                 📹 *Send me a YouTube link* and I'll:\n\
                 \u{2022} Summarize the video with key points\n\
                 \u{2022} Let you ask questions about it\n\
                 \u{2022} Respond in English or an Indian language\n\n\
                 🌐 *Language support:* English, Hindi, Tamil, Telugu, Kannada, Marathi\n\
                 Just say *'Summarize in Hindi'* to switch.\n\n\
                 📌 *Commands:*\n\
                 /summary — Show last summary\n\
                 /deepdive — Deep analysis of the video\n\
                 /actionpoints — Actionable items from the video\n\
                 /reset — Clear current session\n\
                 /help — Show this message"
            );
            services.telegram.try_send(chat_id, &welcome).await;
        }

        "/summary" => {
            let session = services.sessions.get_or_create(chat_id);
            match session.summary {
                Some(summary) if session.has_video() => {
                    services.telegram.deliver(chat_id, None, &summary).await;
                }
                _ => {
                    services.telegram.try_send(chat_id, NO_VIDEO).await;
                }
            }
        }

        "/deepdive" => {
            let session = services.sessions.get_or_create(chat_id);
            let Some(transcript) = session.transcript else {
                services.telegram.try_send(chat_id, NO_VIDEO).await;
                return Ok(());
            };
            let placeholder = services
                .telegram
                .try_send(chat_id, "🔍 Running deep analysis…")
                .await;
            let result = services.llm.deep_dive(&transcript, session.language).await;
            deliver_result(services, chat_id, placeholder, result).await;
        }

        "/actionpoints" => {
            let session = services.sessions.get_or_create(chat_id);
            let Some(transcript) = session.transcript else {
                services.telegram.try_send(chat_id, NO_VIDEO).await;
                return Ok(());
            };
            let placeholder = services
                .telegram
                .try_send(chat_id, "✅ Extracting action points…")
                .await;
            let result = services.llm.action_points(&transcript, session.language).await;
            deliver_result(services, chat_id, placeholder, result).await;
        }

        "/reset" => {
            services.sessions.reset(chat_id);
            services
                .telegram
                .try_send(chat_id, "🔄 Session cleared! Send a new YouTube link to start fresh.")
                .await;
        }

        _ => {
            services
                .telegram
                .try_send(chat_id, "🤷 Unknown command — /help lists what I can do.")
                .await;
        }
    }
    Ok(())
}
