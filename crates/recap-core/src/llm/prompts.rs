//! Prompt construction for summarization, translation and grounded Q&A.
//!
//! Transcripts are clipped to a word budget before being sent; the models in
//! use have limited context windows and a three-hour video does not fit.

use super::language::Language;
use crate::session::{ChatRole, ChatTurn};

/// Word budget for the transcript slice sent with a summary request
/// (roughly 6,000 tokens).
const SUMMARY_TRANSCRIPT_WORDS: usize = 4500;
/// Word budget for the transcript slice sent with Q&A and analysis requests.
const ANALYSIS_TRANSCRIPT_WORDS: usize = 4000;
/// Number of most recent Q&A turns replayed to the model.
const HISTORY_WINDOW: usize = 8;

/// First `limit` whitespace-separated words of `text`.
fn clip_words(text: &str, limit: usize) -> String {
    text.split_whitespace()
        .take(limit)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn summary_system(language: Language) -> String {
    format!(
        r#"You are an expert video analyst and researcher.
Produce a highly detailed, comprehensive, and structured summary in {language}.
Output ONLY the summary — no preamble, no explanation.
Extract as much valuable information, nuance, and context from the transcript as possible.

Use this exact format:
🎦 *Video Title & Overview*
[Inferred title — be specific]
[A solid 3-4 sentence paragraph summarizing the entire video's premise, background context, and ultimate goal.]

📌 *Detailed Key Points & Arguments*
[Provide 7 to 10 highly detailed bullet points. Do not just list topics; explain the 'how' and 'why' for each point. Include statistics, examples, or specific anecdotes mentioned in the video.]
• [Detailed Point 1]
• [Detailed Point 2]
• [Detailed Point 3]
...

🚀 *Actionable Insights & Takeaways*
[If applicable, list 3-5 things the viewer can actually learn, do, or apply based on the video.]

⏱ *Chronological Flow*
• ~Beginning — [What was discussed in the first part]
• ~Middle — [The core discussion/climax]
• ~End — [Conclusions and final thoughts]

🧠 *Final Conclusion*
[2-3 sentences wrapping up the most important overarching theme of this video.]"#
    )
}

pub fn summary_user(transcript: &str) -> String {
    format!(
        "Transcript:\n{}",
        clip_words(transcript, SUMMARY_TRANSCRIPT_WORDS)
    )
}

pub fn translation_system(language: Language) -> String {
    format!(
        "You are a translator. Translate this YouTube summary into {language}. \
         Keep all emojis and structure identical. Output ONLY the translated text."
    )
}

pub fn qa_system(language: Language) -> String {
    format!(
        r#"You are a helpful video assistant. Answer questions based ONLY on the transcript.
If the answer is not in the transcript, say: "❓ This topic is not covered in the video."
Do NOT make up information. Be conversational, concise, and FORMAT YOUR ANSWER NEATLY USING BULLET POINTS OR NUMBERED LISTS where appropriate. Respond in {language}."#
    )
}

pub fn qa_user(transcript: &str, history: &[ChatTurn], question: &str) -> String {
    let recent = history.len().saturating_sub(HISTORY_WINDOW);
    let mut history_text = String::new();
    for turn in &history[recent..] {
        let speaker = match turn.role {
            ChatRole::User => "User",
            ChatRole::Assistant => "Bot",
        };
        history_text.push_str(speaker);
        history_text.push_str(": ");
        history_text.push_str(&turn.content);
        history_text.push('\n');
    }

    format!(
        "Transcript:\n{}\n\nConversation so far:\n{}User: {}",
        clip_words(transcript, ANALYSIS_TRANSCRIPT_WORDS),
        history_text,
        question
    )
}

pub fn deep_dive_system(language: Language) -> String {
    format!(
        "Provide a detailed analytical deep-dive in {language}: main themes, \
         key arguments, evidence, observations."
    )
}

pub fn action_points_system(language: Language) -> String {
    format!(
        "Extract every actionable recommendation and next step as a numbered \
         list in {language}."
    )
}

pub fn analysis_user(transcript: &str) -> String {
    format!(
        "Transcript:\n{}",
        clip_words(transcript, ANALYSIS_TRANSCRIPT_WORDS)
    )
}
