//! Text flattening shared by the classifier, the segmenter and the linker.
//!
//! Scanned-and-retyped returns mix non-breaking spaces, ligatures and full-width
//! punctuation into otherwise ASCII text, so every comparison goes through NFKC
//! first.
use unicode_normalization::UnicodeNormalization;

pub fn normalize(text: &str) -> String {
    text.nfkc().collect()
}

/// NFKC text with whitespace runs collapsed to one space and trimmed.
pub fn spaced(text: &str) -> String {
    normalize(text).split_whitespace().collect::<Vec<_>>().join(" ")
}

/// NFKC text with all whitespace removed.
pub fn flat(text: &str) -> String {
    normalize(text).chars().filter(|c| !c.is_whitespace()).collect()
}

/// Collapses whitespace without normalizing, used on captured names.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Removes ASCII punctuation and all whitespace.
pub fn strip_punctuation_and_space(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_ascii_punctuation() && !c.is_whitespace())
        .collect()
}

pub fn has_ascii_letter(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_alphabetic())
}
