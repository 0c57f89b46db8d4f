use foodq_model::{NormalizedRecord, Scope, Violation, ViolationCode, format_number};
use foodq_normalize::derive_log;

use super::RuleContext;

/// `saturated_fat_100g <= fat_100g` when both are present.
pub(super) fn fat_consistency(
    record: &NormalizedRecord,
    _ctx: &RuleContext<'_>,
) -> Option<Violation> {
    let fat = record.number("fat_100g")?;
    let saturated = record.number("saturated_fat_100g")?;
    (saturated > fat).then(|| {
        Violation::new(
            Scope::fields(["saturated_fat_100g", "fat_100g"]),
            ViolationCode::FatInconsistent,
            format!("saturated_fat_100g {saturated} exceeds fat_100g {fat}"),
        )
    })
}

/// `sugars_100g <= carbohydrates_100g` when both are present.
pub(super) fn sugars_consistency(
    record: &NormalizedRecord,
    _ctx: &RuleContext<'_>,
) -> Option<Violation> {
    let carbohydrates = record.number("carbohydrates_100g")?;
    let sugars = record.number("sugars_100g")?;
    (sugars > carbohydrates).then(|| {
        Violation::new(
            Scope::fields(["sugars_100g", "carbohydrates_100g"]),
            ViolationCode::SugarsInconsistent,
            format!("sugars_100g {sugars} exceeds carbohydrates_100g {carbohydrates}"),
        )
    })
}

/// Largest accepted gap between a provided log value and `ln(source)`.
/// Covers values rounded to two decimals.
const LOG_TOLERANCE: f64 = 0.005;

/// A present log field needs a positive source value whose natural log it
/// matches. One violation names every offending log field.
pub(super) fn log_consistency(
    record: &NormalizedRecord,
    ctx: &RuleContext<'_>,
) -> Option<Violation> {
    let mut scope = Vec::new();
    let mut details = Vec::new();
    for domain in ctx.schema.fields() {
        let Some(source) = domain.source.as_deref() else {
            continue;
        };
        let Some(log_value) = record.number(&domain.name) else {
            continue;
        };
        let detail = match derive_log(record.number(source)) {
            None => format!(
                "{} {} present but {source} is missing or not above 0",
                domain.name,
                format_number(log_value)
            ),
            Some(expected) if (expected - log_value).abs() > LOG_TOLERANCE => format!(
                "{} {} differs from ln({source}) {}",
                domain.name,
                format_number(log_value),
                format_number(expected)
            ),
            Some(_) => continue,
        };
        details.push(detail);
        scope.push(domain.name.clone());
        scope.push(source.to_string());
    }
    if details.is_empty() {
        return None;
    }
    Some(Violation::new(
        Scope::Fields(scope),
        ViolationCode::LogInconsistent,
        details.join("; "),
    ))
}
