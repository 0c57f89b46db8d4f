//! Vocabulary membership of multi-value tokens.

use foodq_model::{FieldValue, Violation, ViolationCode};
use foodq_standards::{FieldDomain, SchemaRegistry};

/// Tokens of a non-extensible vocabulary must be canonical terms or match
/// the vocabulary pattern. One violation lists every offending token.
pub(super) fn check(
    domain: &FieldDomain,
    value: &FieldValue,
    schema: &SchemaRegistry,
) -> Option<Violation> {
    let vocabulary = schema.vocabulary_for(domain)?;
    if vocabulary.extensible {
        return None;
    }
    let unknown: Vec<&str> = value
        .tokens()
        .iter()
        .map(String::as_str)
        .filter(|token| !vocabulary.is_valid(token))
        .collect();
    if unknown.is_empty() {
        return None;
    }
    Some(Violation::field(
        domain.name.as_str(),
        ViolationCode::InvalidCategory,
        format!(
            "{} not in the {} vocabulary",
            unknown.join(", "),
            vocabulary.name
        ),
    ))
}
