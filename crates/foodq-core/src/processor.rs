//! Per-record state machine.
//!
//! `Raw -> Normalized -> Validated -> ConsistencyChecked -> Done`, or
//! `Failed` when the row cannot be interpreted field by field. Field and
//! consistency violations never fail a record.

use foodq_model::{
    EngineConfig, FaultKind, RawRecord, RecordOutcome, RecordState, StructuralFault,
    UnknownFieldPolicy,
};
use foodq_normalize::Normalizer;
use foodq_standards::{KEY_FIELD, SchemaRegistry};
use foodq_validate::checks::run_all;
use foodq_validate::{FieldContext, RuleContext, RuleRegistry};
use tracing::{debug, trace};

/// Everything a record needs besides itself. All borrowed read-only.
#[derive(Debug, Clone, Copy)]
pub struct ProcessContext<'a> {
    pub schema: &'a SchemaRegistry,
    pub config: &'a EngineConfig,
    pub rules: &'a RuleRegistry,
}

fn product_id(raw: &RawRecord) -> Option<String> {
    raw.fields
        .iter()
        .find(|(name, _)| name.trim().eq_ignore_ascii_case(KEY_FIELD))
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn structural_fault(raw: &RawRecord, ctx: &ProcessContext<'_>) -> Option<StructuralFault> {
    if let Some(reason) = &raw.malformed {
        return Some(StructuralFault {
            kind: FaultKind::MalformedRow,
            message: reason.clone(),
        });
    }
    if ctx.config.unknown_fields == UnknownFieldPolicy::Fail {
        let undeclared: Vec<&str> = raw
            .field_names()
            .filter(|name| !ctx.schema.contains(name))
            .collect();
        if !undeclared.is_empty() {
            return Some(StructuralFault {
                kind: FaultKind::UndeclaredField,
                message: format!("not declared in the schema: {}", undeclared.join(", ")),
            });
        }
    }
    None
}

/// Run one record through normalization, field checks and consistency rules.
pub fn process_record(raw: &RawRecord, ctx: &ProcessContext<'_>) -> RecordOutcome {
    let product_id = product_id(raw);

    if let Some(fault) = structural_fault(raw, ctx) {
        debug!(row = raw.row, fault = %fault, "record failed");
        return RecordOutcome::failed(raw.row, product_id, fault);
    }

    let mut state = RecordState::Raw;
    let output = Normalizer::new(ctx.schema, ctx.config).normalize_record(raw);
    let mut violations = output.faults;
    let record = output.record;
    state = state.next().unwrap_or(state);
    trace!(row = raw.row, ?state, faults = violations.len(), "normalized");

    let field_ctx = FieldContext::new(ctx.schema, ctx.config.unknown_label_sentinel);
    violations.extend(run_all(&record, &field_ctx));
    state = state.next().unwrap_or(state);
    trace!(row = raw.row, ?state, violations = violations.len(), "fields checked");

    let rule_ctx = RuleContext::new(ctx.schema, ctx.config);
    violations.extend(ctx.rules.run(&record, &rule_ctx));
    state = state.next().unwrap_or(state);
    trace!(row = raw.row, ?state, violations = violations.len(), "rules evaluated");

    state = state.next().unwrap_or(state);
    debug!(
        row = raw.row,
        violations = violations.len(),
        "record processed"
    );

    RecordOutcome {
        row: raw.row,
        state,
        product_id,
        record: Some(record),
        violations,
        fault: None,
    }
}
