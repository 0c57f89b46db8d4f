//! Multi-value field tokenization.

use foodq_model::{FieldValue, ListSeparator, MatchingMode};
use foodq_standards::{Vocabulary, term_key};

use crate::matching::resolve_token;

/// Strip taxonomy language prefixes such as `en:` or `fr:`.
fn strip_language_prefix(mut token: &str) -> &str {
    while let Some((prefix, rest)) = token.split_once(':')
        && prefix.len() == 2
        && prefix.chars().all(|ch| ch.is_ascii_alphabetic())
    {
        token = rest.trim_start();
    }
    token.trim()
}

/// Split `raw` into lowercase tokens with single inner spaces.
///
/// Tokens are separated by `,`, `;` and `|`; with [`ListSeparator::Space`]
/// whitespace separates tokens too. Empty tokens are dropped.
pub fn split_tokens(raw: &str, separator: ListSeparator) -> Vec<String> {
    let split_on_space = separator == ListSeparator::Space;
    raw.split(|ch: char| matches!(ch, ',' | ';' | '|') || (split_on_space && ch.is_whitespace()))
        .map(|token| strip_language_prefix(&term_key(token)).to_string())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tokenize `raw`, map each token onto the vocabulary and drop repeats,
/// keeping first occurrences. Unmatched tokens are kept as written; the
/// validator decides whether they are acceptable.
pub fn normalize_list(
    raw: &str,
    vocabulary: &Vocabulary,
    mode: MatchingMode,
    threshold: f64,
) -> FieldValue {
    let mut tokens: Vec<String> = Vec::new();
    for token in split_tokens(raw, vocabulary.separator) {
        let canonical = resolve_token(vocabulary, &token, mode, threshold).unwrap_or(token);
        if !tokens.contains(&canonical) {
            tokens.push(canonical);
        }
    }
    if tokens.is_empty() {
        FieldValue::Missing
    } else {
        FieldValue::List {
            tokens,
            separator: vocabulary.separator,
        }
    }
}
