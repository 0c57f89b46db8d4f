use foodq_model::{NormalizedRecord, Scope, Violation, ViolationCode, format_number};

use super::RuleContext;

/// `additives_count` matches the number of `additives_cleaned` codes when both
/// are present.
pub(super) fn count_consistency(
    record: &NormalizedRecord,
    _ctx: &RuleContext<'_>,
) -> Option<Violation> {
    let count = record.number("additives_count")?;
    if !record.is_present("additives_cleaned") {
        return None;
    }
    let codes = record.tokens("additives_cleaned").len();
    #[allow(clippy::cast_precision_loss)]
    let matches = count == codes as f64;
    if matches {
        return None;
    }
    Some(Violation::new(
        Scope::fields(["additives_count", "additives_cleaned"]),
        ViolationCode::AdditivesCountMismatch,
        format!(
            "additives_count is {} but additives_cleaned lists {codes} codes",
            format_number(count)
        ),
    ))
}
