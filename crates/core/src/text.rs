//! Text normalization and the canonical item-text builder.
//!
//! Both functions are pure and deterministic: identical item data always
//! yields identical text and identical tokens, which the scorer relies on.

use crate::item::{ItemProfile, Polarity};

/// Tokens with this many characters or fewer are discarded.
pub const MIN_TOKEN_LEN_EXCLUSIVE: usize = 2;

/// English function words that carry no matching signal.
pub const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "was", "are", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "should", "could", "may", "might", "must", "can", "it", "he", "she", "they", "we",
    "you", "i", "me", "him", "her", "them", "us", "my", "your", "his", "their", "our", "this",
    "that", "these", "those",
];

/// Lowercase, replace everything but ASCII letters with spaces, and collapse
/// whitespace.
pub fn preprocess(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut cleaned = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        if ch.is_ascii_lowercase() {
            cleaned.push(ch);
        } else {
            cleaned.push(' ');
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split text into scoring tokens.
///
/// Applies [`preprocess`], then drops stop words and tokens of length
/// [`MIN_TOKEN_LEN_EXCLUSIVE`] or less. Order and repeats are preserved.
pub fn tokenize(text: &str) -> Vec<String> {
    preprocess(text)
        .split(' ')
        .filter(|token| token.len() > MIN_TOKEN_LEN_EXCLUSIVE)
        .filter(|token| !STOP_WORDS.contains(token))
        .map(str::to_string)
        .collect()
}

/// `Some(value)` unless the value is empty or whitespace only.
pub fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Build the text representation of an item that is fed to the scorer.
///
/// Field order is fixed: title, description, `category: X`, `brand: X`,
/// `color: X`, `condition: X`, then `lost at: X` or `found at: X`. Absent or
/// blank fields are omitted.
pub fn item_text(item: &ItemProfile) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(7);

    if let Some(title) = non_blank(&item.title) {
        parts.push(title.to_string());
    }
    if let Some(description) = non_blank(&item.description) {
        parts.push(description.to_string());
    }
    if let Some(category) = item.category() {
        parts.push(format!("category: {category}"));
    }
    if let Some(brand) = item.brand.as_deref().and_then(non_blank) {
        parts.push(format!("brand: {brand}"));
    }
    if let Some(color) = item.color() {
        parts.push(format!("color: {color}"));
    }
    if let Some(condition) = item.condition.as_deref().and_then(non_blank) {
        parts.push(format!("condition: {condition}"));
    }
    if let Some(location) = item.location() {
        let label = match item.polarity {
            Polarity::Lost => "lost at",
            Polarity::Found => "found at",
        };
        parts.push(format!("{label}: {location}"));
    }

    parts.join(" ")
}
