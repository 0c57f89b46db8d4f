use foodq_model::{NormalizedRecord, Scope, Violation, ViolationCode, format_number};
use foodq_standards::FieldKind;

use super::RuleContext;

/// Every present ratio field lies within its declared range. One violation
/// names all offending ratios.
pub(super) fn bounds(record: &NormalizedRecord, ctx: &RuleContext<'_>) -> Option<Violation> {
    let mut offending = Vec::new();
    let mut details = Vec::new();
    for domain in ctx
        .schema
        .fields()
        .iter()
        .filter(|domain| domain.kind == FieldKind::Ratio)
    {
        let Some(value) = record.number(&domain.name) else {
            continue;
        };
        if !domain.range.contains(value) {
            details.push(format!(
                "{} {} outside {}",
                domain.name,
                format_number(value),
                domain.range.describe()
            ));
            offending.push(domain.name.clone());
        }
    }
    if offending.is_empty() {
        return None;
    }
    Some(Violation::new(
        Scope::Fields(offending),
        ViolationCode::RatioOutOfBounds,
        details.join("; "),
    ))
}
