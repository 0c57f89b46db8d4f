//! Field validation checks.
//!
//! Each module checks one family of field kinds. Fields are checked
//! independently of each other.

mod binary;
mod category;
mod list;
mod numeric;
mod required;

use foodq_model::{FieldValue, NormalizedRecord, UnknownSentinel, Violation};
use foodq_standards::{FieldDomain, FieldKind, SchemaRegistry};

/// Read-only inputs shared by the field checks.
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    pub schema: &'a SchemaRegistry,
    /// Dataset-wide encoding of an unknown categorical label.
    pub sentinel: UnknownSentinel,
}

impl<'a> FieldContext<'a> {
    pub fn new(schema: &'a SchemaRegistry, sentinel: UnknownSentinel) -> Self {
        Self { schema, sentinel }
    }
}

/// Check one normalized value against its domain.
pub fn check_field(
    domain: &FieldDomain,
    value: &FieldValue,
    ctx: &FieldContext<'_>,
) -> Option<Violation> {
    if value.is_missing() {
        return category::check_blank(domain, ctx.sentinel).or_else(|| required::check(domain));
    }
    match domain.kind {
        FieldKind::Categorical | FieldKind::Code => category::check(domain, value, ctx.sentinel),
        FieldKind::Numeric | FieldKind::Ratio => numeric::check(domain, value),
        FieldKind::Binary => binary::check_binary(domain, value),
        FieldKind::Digits => binary::check_digits(domain, value),
        FieldKind::MultiValue => list::check(domain, value, ctx.schema),
        FieldKind::FreeText | FieldKind::CleanedText | FieldKind::Opaque => None,
    }
}

/// Run the field checks over every declared field of `record`, then report
/// required fields the record does not carry at all.
pub fn run_all(record: &NormalizedRecord, ctx: &FieldContext<'_>) -> Vec<Violation> {
    let mut violations: Vec<Violation> = record
        .fields
        .iter()
        .filter_map(|(name, value)| {
            let domain = ctx.schema.get(name)?;
            check_field(domain, value, ctx)
        })
        .collect();

    violations.extend(
        ctx.schema
            .fields()
            .iter()
            .filter(|domain| domain.is_required() && record.get(&domain.name).is_none())
            .filter_map(required::check),
    );
    violations
}
