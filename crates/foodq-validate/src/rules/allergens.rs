//! Allergen provenance.
//!
//! `allergens_cleaned` must come from the `allergens` statement. A token that
//! the raw `allergens` text does not mention but the raw `traces` text does
//! was taken from traces, which is only acceptable when the record says so
//! with `allergens_combined = 1`.

use std::collections::BTreeSet;

use foodq_model::{FieldValue, NormalizedRecord, Scope, Violation, ViolationCode};
use foodq_normalize::normalize_list;

use super::RuleContext;

/// Canonical allergens a raw statement names, either as list tokens or as
/// whole words inside a phrase such as `Contains: milk and eggs`.
fn canonical_tokens(record: &NormalizedRecord, field: &str, ctx: &RuleContext<'_>) -> BTreeSet<String> {
    let (Some(text), Some(vocabulary)) = (
        record.get(field).map(FieldValue::render),
        ctx.schema.vocabularies().get("allergens"),
    ) else {
        return BTreeSet::new();
    };
    let mut tokens: BTreeSet<String> = vocabulary
        .mentions(&text)
        .into_iter()
        .map(str::to_string)
        .collect();
    if let FieldValue::List { tokens: listed, .. } = normalize_list(
        &text,
        vocabulary,
        ctx.config.matching_mode,
        ctx.config.fuzzy_threshold,
    ) {
        tokens.extend(listed);
    }
    tokens
}

pub(super) fn source_ambiguity(
    record: &NormalizedRecord,
    ctx: &RuleContext<'_>,
) -> Option<Violation> {
    let cleaned = record.tokens("allergens_cleaned");
    if cleaned.is_empty() || record.text("allergens_combined") == Some("1") {
        return None;
    }

    let declared = canonical_tokens(record, "allergens", ctx);
    let traces = canonical_tokens(record, "traces", ctx);
    let from_traces: Vec<&str> = cleaned
        .iter()
        .filter(|token| {
            !declared.contains(token.as_str()) && traces.contains(token.as_str())
        })
        .map(String::as_str)
        .collect();
    if from_traces.is_empty() {
        return None;
    }

    Some(Violation::new(
        Scope::fields(["allergens_cleaned", "allergens", "traces"]),
        ViolationCode::AllergenSourceAmbiguous,
        format!(
            "{} only appear in traces; set allergens_combined = 1 if intended",
            from_traces.join(", ")
        ),
    ))
}
