//! Text-specific validation functions

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::validation::limits::{Bound, LimitRange};
use crate::validation::types::{Code, RuleResult};

/// Tag reported when no known script is found in the text
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Script ranges used for language detection, in reporting order
static LANGUAGE_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("zh", r"[\x{4E00}-\x{9FFF}]"),
        ("en", r"[a-zA-Z]"),
        ("ja", r"[\x{3040}-\x{309F}\x{30A0}-\x{30FF}]"),
        ("ko", r"[\x{AC00}-\x{D7AF}]"),
    ]
    .into_iter()
    .map(|(tag, pattern)| {
        let regex = Regex::new(pattern).expect("Failed to compile language regex");
        (tag, regex)
    })
    .collect()
});

/// Rejects text containing any entry of a `;`-separated blacklist.
/// Matching is case-sensitive substring containment.
pub fn validate_banned_words(text: &str, banned_words: &str) -> RuleResult {
    let banned = banned_words
        .split(';')
        .map(str::trim)
        .filter(|word| !word.is_empty());

    for word in banned {
        if text.contains(word) {
            debug!("Prompt contains banned word {:?}", word);
            return RuleResult::fail(
                Code::BannedWord,
                format!("prompt contains banned word: {}", word),
            );
        }
    }
    RuleResult::pass()
}

/// Weighted character count: 1.0 per non-ASCII character, 0.5 otherwise
pub fn calculate_char_count(text: &str) -> f64 {
    text.chars()
        .map(|c| if (c as u32) > 127 { 1.0 } else { 0.5 })
        .sum()
}

pub fn validate_char_count(text: &str, limit: &str) -> RuleResult {
    let range = match LimitRange::parse_int(limit) {
        Ok(Some(range)) => range,
        Ok(None) => return RuleResult::pass(),
        Err(e) => {
            return RuleResult::fail(Code::InvalidLimit, format!("invalid char_count_limit: {}", e))
        }
    };

    let count = calculate_char_count(text);
    match range.check(count) {
        Bound::Within => RuleResult::pass(),
        Bound::BelowMin => RuleResult::fail(
            Code::TooFewChars,
            format!(
                "too few characters: {} counted, at least {} required",
                count.trunc(),
                range.min
            ),
        ),
        Bound::AboveMax => RuleResult::fail(
            Code::TooManyChars,
            format!(
                "too many characters: {} counted, at most {} allowed",
                count.trunc(),
                range.max
            ),
        ),
    }
}

/// Returns every language tag whose script appears in the text,
/// or `["unknown"]` when none does.
pub fn detect_languages(text: &str) -> Vec<&'static str> {
    let detected: Vec<&'static str> = LANGUAGE_PATTERNS
        .iter()
        .filter(|(_, regex)| regex.is_match(text))
        .map(|(tag, _)| *tag)
        .collect();

    if detected.is_empty() {
        vec![UNKNOWN_LANGUAGE]
    } else {
        detected
    }
}

/// Passes when at least one detected language is in the comma-separated list
pub fn validate_language(text: &str, supported_languages: &str) -> RuleResult {
    let supported: Vec<&str> = supported_languages
        .split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .collect();
    if supported.is_empty() {
        return RuleResult::pass();
    }

    let detected = detect_languages(text);
    if detected.iter().any(|lang| supported.contains(lang)) {
        return RuleResult::pass();
    }

    RuleResult::fail(
        Code::UnsupportedLanguage,
        format!(
            "unsupported prompt language: detected {}, supported {}",
            detected.join(","),
            supported_languages
        ),
    )
}
