//! Pairwise text similarity scoring.
//!
//! The score blends a term-frequency cosine with a Jaccard set overlap. Term
//! weights are per-comparison frequencies (count / token count of that text);
//! no corpus-wide inverse document frequency is gathered. Downstream
//! thresholds are tuned against exactly this behaviour.
//!
//! No function in this module fails: degenerate input scores `0.0`.

use std::collections::{BTreeMap, BTreeSet};

use crate::text;

/// Weight of the term-frequency cosine in the combined score.
pub const TERM_FREQUENCY_WEIGHT: f64 = 0.7;

/// Weight of the Jaccard overlap in the combined score.
pub const JACCARD_WEIGHT: f64 = 0.3;

/// Score two free-form texts in `[0.0, 1.0]`.
///
/// Returns `0.0` when either text has no tokens after normalization.
pub fn score(text_a: &str, text_b: &str) -> f64 {
    score_tokens(&text::tokenize(text_a), &text::tokenize(text_b))
}

/// Score two already-tokenized texts in `[0.0, 1.0]`.
pub fn score_tokens(tokens_a: &[String], tokens_b: &[String]) -> f64 {
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let combined = TERM_FREQUENCY_WEIGHT * term_frequency_cosine(tokens_a, tokens_b)
        + JACCARD_WEIGHT * jaccard(tokens_a, tokens_b);
    combined.clamp(0.0, 1.0)
}

/// Cosine of the per-text term-frequency vectors over the union vocabulary.
///
/// Returns `0.0` if either side is empty.
pub fn term_frequency_cosine(tokens_a: &[String], tokens_b: &[String]) -> f64 {
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(tokens_a);
    let counts_b = term_counts(tokens_b);
    let len_a = tokens_a.len() as f64;
    let len_b = tokens_b.len() as f64;

    let vocabulary: BTreeSet<&str> = counts_a.keys().chain(counts_b.keys()).copied().collect();

    let mut dot = 0.0;
    let mut sum_sq_a = 0.0;
    let mut sum_sq_b = 0.0;
    for term in vocabulary {
        let weight_a = counts_a.get(term).copied().unwrap_or(0) as f64 / len_a;
        let weight_b = counts_b.get(term).copied().unwrap_or(0) as f64 / len_b;
        dot += weight_a * weight_b;
        sum_sq_a += weight_a * weight_a;
        sum_sq_b += weight_b * weight_b;
    }

    if sum_sq_a == 0.0 || sum_sq_b == 0.0 {
        return 0.0;
    }

    // sqrt(a * b) rather than sqrt(a) * sqrt(b) keeps self-similarity exact.
    dot / (sum_sq_a * sum_sq_b).sqrt()
}

/// Size of the token-set intersection over the size of the union.
///
/// Two empty sets are identical (`1.0`).
pub fn jaccard(tokens_a: &[String], tokens_b: &[String]) -> f64 {
    let set_a: BTreeSet<&str> = tokens_a.iter().map(String::as_str).collect();
    let set_b: BTreeSet<&str> = tokens_b.iter().map(String::as_str).collect();

    if set_a.is_empty() && set_b.is_empty() {
        return 1.0;
    }

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }

    set_a.intersection(&set_b).count() as f64 / union as f64
}

fn term_counts(tokens: &[String]) -> BTreeMap<&str, usize> {
    let mut counts = BTreeMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}
