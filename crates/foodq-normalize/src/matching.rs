//! Vocabulary matching for multi-value tokens.

use foodq_model::MatchingMode;
use foodq_standards::{Vocabulary, term_key};
use rapidfuzz::distance::jaro_winkler;

/// Keeps only lowercase ASCII alphanumerics, so `tree-nuts`, `Tree Nuts`
/// and `tree_nuts` share a key.
pub fn compact_key(value: &str) -> String {
    value
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|ch| ch.to_ascii_lowercase())
        .collect()
}

fn resolve_strict(vocabulary: &Vocabulary, token: &str) -> Option<String> {
    vocabulary.resolve(token).map(str::to_string)
}

fn resolve_lenient(vocabulary: &Vocabulary, token: &str, threshold: f64) -> Option<String> {
    if let Some(value) = resolve_strict(vocabulary, token) {
        return Some(value);
    }

    let input_compact = compact_key(token);
    if input_compact.is_empty() {
        return None;
    }
    for (key, canonical) in vocabulary.entries() {
        if compact_key(key) == input_compact {
            return Some(canonical.to_string());
        }
    }

    let input = term_key(token);
    let mut best: Option<(f64, &str)> = None;
    for (key, canonical) in vocabulary.entries() {
        let score = jaro_winkler::similarity(input.chars(), key.chars());
        if score >= threshold && best.is_none_or(|(top, _)| score > top) {
            best = Some((score, canonical));
        }
    }
    best.map(|(_, canonical)| canonical.to_string())
}

/// Canonical term for `token`, or `None` when the vocabulary has no match.
///
/// Ties in fuzzy score keep the first entry in key order.
pub fn resolve_token(
    vocabulary: &Vocabulary,
    token: &str,
    mode: MatchingMode,
    threshold: f64,
) -> Option<String> {
    if token.trim().is_empty() {
        return None;
    }
    match mode {
        MatchingMode::Strict => resolve_strict(vocabulary, token),
        MatchingMode::Lenient => resolve_lenient(vocabulary, token, threshold),
    }
}
