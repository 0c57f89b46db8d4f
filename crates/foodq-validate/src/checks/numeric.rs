//! Numeric type and range checks.

use foodq_model::{FieldValue, Violation, ViolationCode};
use foodq_standards::{FieldDomain, FieldKind};

pub(super) fn check(domain: &FieldDomain, value: &FieldValue) -> Option<Violation> {
    let Some(number) = value.as_number() else {
        return Some(Violation::field(
            domain.name.as_str(),
            ViolationCode::NotNumeric,
            format!("'{}' is not a number", value.render()),
        ));
    };

    // Ratio bounds belong to the ratio consistency rule.
    if domain.kind == FieldKind::Ratio {
        return None;
    }

    if !domain.range.contains(number) {
        return Some(Violation::field(
            domain.name.as_str(),
            ViolationCode::OutOfRange,
            format!("{number} is outside {}", domain.range.describe()),
        ));
    }
    if domain.range.integer && number.fract() != 0.0 {
        return Some(Violation::field(
            domain.name.as_str(),
            ViolationCode::OutOfRange,
            format!("{number} is not a whole number"),
        ));
    }
    None
}
