//! Placeholder language detection.
//!
//! This is a script heuristic, not a classifier: only the first character
//! decides the script, and Latin text is told apart by a handful of
//! diacritics and greeting words.

use crate::shared::types::Language;

/// Contiguous code point blocks mapped to the language that owns them.
const SCRIPT_BLOCKS: &[(char, char, Language)] = &[
    ('\u{3040}', '\u{309F}', Language::Japanese),  // Hiragana
    ('\u{30A0}', '\u{30FF}', Language::Japanese),  // Katakana
    ('\u{31F0}', '\u{31FF}', Language::Japanese),  // Katakana Phonetic Extensions
    ('\u{4E00}', '\u{9FFF}', Language::Chinese),   // CJK Unified Ideographs
    ('\u{3400}', '\u{4DBF}', Language::Chinese),   // CJK Extension A
    ('\u{0900}', '\u{097F}', Language::Hindi),     // Devanagari
    ('\u{0980}', '\u{09FF}', Language::Bengali),
    ('\u{0B80}', '\u{0BFF}', Language::Tamil),
    ('\u{0C00}', '\u{0C7F}', Language::Telugu),
    ('\u{0C80}', '\u{0CFF}', Language::Kannada),
    ('\u{0D00}', '\u{0D7F}', Language::Malayalam),
    ('\u{0E00}', '\u{0E7F}', Language::Thai),
    ('\u{0E80}', '\u{0EFF}', Language::Lao),
    ('\u{1000}', '\u{109F}', Language::Myanmar),
    ('\u{1780}', '\u{17FF}', Language::Khmer),
];

const DIACRITIC_CUES: &[(&[char], Language)] = &[
    (&['ñ', '¿', '¡'], Language::Spanish),
    (&['é', 'à', 'ç', 'è', 'ê'], Language::French),
    (&['ß', 'ü', 'ö', 'ä'], Language::German),
];

// Plain-ASCII greetings that would otherwise fall through to English.
const WORD_CUES: &[(&str, Language)] = &[
    ("bonjour", Language::French),
    ("bonsoir", Language::French),
    ("merci", Language::French),
    ("salut", Language::French),
    ("hola", Language::Spanish),
    ("gracias", Language::Spanish),
    ("buenos", Language::Spanish),
    ("adios", Language::Spanish),
    ("hallo", Language::German),
    ("danke", Language::German),
    ("guten", Language::German),
    ("bitte", Language::German),
];

/// Guess the language of `text`.
///
/// Returns `None` only when there is nothing to look at; any non-empty
/// input yields some language, English being the catch-all.
pub fn detect_language(text: &str) -> Option<Language> {
    let trimmed = text.trim_start();
    let first = trimmed.chars().next()?;

    if let Some(lang) = detect_script(first) {
        return Some(lang);
    }

    Some(detect_latin(trimmed))
}

fn detect_script(c: char) -> Option<Language> {
    SCRIPT_BLOCKS
        .iter()
        .find(|(start, end, _)| (*start..=*end).contains(&c))
        .map(|(_, _, lang)| *lang)
}

fn detect_latin(text: &str) -> Language {
    let lowered = text.to_lowercase();

    for (marks, lang) in DIACRITIC_CUES {
        if lowered.chars().any(|c| marks.contains(&c)) {
            return *lang;
        }
    }

    let first_word: String = lowered
        .chars()
        .take_while(|c| c.is_alphabetic())
        .collect();
    WORD_CUES
        .iter()
        .find(|(word, _)| *word == first_word)
        .map(|(_, lang)| *lang)
        .unwrap_or(Language::English)
}
