use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::core::confidence::round4;
use crate::core::model::{AgendaSession, EnrichedPhoto, TextSnippet};

/// Lowest semantic score; a photo always belongs to the workshop.
pub const SEMANTIC_FLOOR: f64 = 0.1;

// Two-letter words stay: abbreviations like "KL" or "OGS" are common in notes.
const WORD_PATTERN: &str = r"\b[a-zäöüß]{2,}\b";

fn word_regex() -> &'static Regex {
    static WORD: OnceLock<Regex> = OnceLock::new();
    WORD.get_or_init(|| Regex::new(WORD_PATTERN).expect("word pattern is valid"))
}

/// Unique lowercase alphabetic tokens of length >= 2.
pub fn tokenize(text: &str) -> HashSet<String> {
    // OCR output sometimes carries decomposed umlauts
    let lowered = text.nfc().collect::<String>().to_lowercase();
    word_regex()
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

pub fn photo_vocabulary(enriched: &EnrichedPhoto) -> HashSet<String> {
    let text = format!(
        "{} {} {}",
        enriched.topic_keywords.join(" "),
        enriched.ocr_text.as_deref().unwrap_or(""),
        enriched.description
    );
    tokenize(&text)
}

/// Session name plus every snippet of the workshop.
pub fn session_vocabulary(session: &AgendaSession, snippets: &[TextSnippet]) -> HashSet<String> {
    let snippet_text = snippets
        .iter()
        .map(|snippet| snippet.content.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    tokenize(&format!("{} {}", session.name, snippet_text))
}

/// Jaccard similarity of both vocabularies, floored at [`SEMANTIC_FLOOR`].
pub fn vocabulary_score(photo_words: &HashSet<String>, session_words: &HashSet<String>) -> f64 {
    if photo_words.is_empty() || session_words.is_empty() {
        return SEMANTIC_FLOOR;
    }
    let intersection = photo_words.intersection(session_words).count() as f64;
    let union = photo_words.union(session_words).count() as f64;
    round4(intersection / union).max(SEMANTIC_FLOOR)
}

pub fn semantic_score(
    enriched: Option<&EnrichedPhoto>,
    session: &AgendaSession,
    snippets: &[TextSnippet],
) -> f64 {
    let Some(enriched) = enriched else {
        return SEMANTIC_FLOOR;
    };
    vocabulary_score(&photo_vocabulary(enriched), &session_vocabulary(session, snippets))
}
