//! Response languages and language request detection.

use std::fmt;

/// Languages the bot can respond in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
    Telugu,
    Kannada,
    Marathi,
}

/// Keyword table scanned in declaration order: the first matching keyword
/// wins, so earlier rows take priority when a message mentions several
/// languages.
const KEYWORDS: &[(&str, Language)] = &[
    ("hindi", Language::Hindi),
    ("हिंदी", Language::Hindi),
    ("tamil", Language::Tamil),
    ("தமிழ்", Language::Tamil),
    ("telugu", Language::Telugu),
    ("తెలుగు", Language::Telugu),
    ("kannada", Language::Kannada),
    ("ಕನ್ನಡ", Language::Kannada),
    ("marathi", Language::Marathi),
    ("मराठी", Language::Marathi),
    ("english", Language::English),
];

impl Language {
    /// Name used in prompts and user-facing messages.
    pub fn name(self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Marathi => "Marathi",
        }
    }

    /// Detect an explicit language request anywhere in a message, e.g.
    /// "summarize in Hindi". Returns `None` when no supported language is
    /// mentioned.
    pub fn detect(text: &str) -> Option<Language> {
        let lower = text.to_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, language)| *language)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_language_keyword_case_insensitively() {
        assert_eq!(Language::detect("Summarize in HINDI please"), Some(Language::Hindi));
        assert_eq!(Language::detect("tamil version?"), Some(Language::Tamil));
    }

    #[test]
    fn detects_native_script_keywords() {
        assert_eq!(Language::detect("हिंदी में बताओ"), Some(Language::Hindi));
        assert_eq!(Language::detect("ಕನ್ನಡ"), Some(Language::Kannada));
    }

    #[test]
    fn plain_questions_are_not_language_requests() {
        assert_eq!(Language::detect("what does the speaker argue?"), None);
    }

    #[test]
    fn earlier_keywords_win_on_conflict() {
        // "hindi" is declared before "english", so a message naming both
        // switches to Hindi.
        assert_eq!(
            Language::detect("in hindi not english"),
            Some(Language::Hindi)
        );
    }

    #[test]
    fn default_language_is_english() {
        assert_eq!(Language::default(), Language::English);
    }
}
