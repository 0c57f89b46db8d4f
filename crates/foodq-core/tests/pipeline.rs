//! End-to-end tests of the record processor and dataset pipeline.

use std::sync::atomic::{AtomicUsize, Ordering};

use foodq_core::{Engine, EngineError};
use foodq_model::{
    ConfigError, EngineConfig, FaultKind, RawRecord, RecordState, UnknownFieldPolicy,
    UnknownSentinel, ValidationMode, ViolationCode,
};
use foodq_standards::{FieldKind, StandardsConfig};
use foodq_validate::RuleRegistry;
use proptest::prelude::*;

fn engine() -> Engine {
    Engine::with_config(EngineConfig::default()).unwrap()
}

fn raw(row: usize, pairs: &[(&str, &str)]) -> RawRecord {
    RawRecord::from_pairs(row, pairs.iter().copied())
}

#[test]
fn default_engine_starts_with_embedded_schema() {
    let engine = Engine::with_config(EngineConfig::default()).unwrap();
    assert!(engine.schema().contains("product_id"));
    assert!(engine.schema().vocabularies().get("additives").is_some());
    assert_eq!(engine.rules().len(), RuleRegistry::standard().len());
}

#[test]
fn fat_and_image_violations_end_to_end() {
    let engine = engine();
    let outcome = engine.process(&raw(
        1,
        &[
            ("product_id", "P1"),
            ("fat_100g", "5"),
            ("saturated_fat_100g", "8"),
            ("nova_group", "2"),
            ("has_image", "1"),
            ("image_path", ""),
        ],
    ));

    assert_eq!(outcome.state, RecordState::Done);
    let codes: Vec<ViolationCode> = outcome.violations.iter().map(|v| v.code).collect();
    assert!(codes.contains(&ViolationCode::FatInconsistent));
    assert!(codes.contains(&ViolationCode::ImagePathMissing));
    assert!(!outcome.violations.iter().any(|v| v.scope.mentions("nova_group")));
    assert!(!outcome.is_accepted(ValidationMode::Lenient));
}

#[test]
fn image_pairing_yields_exactly_one_violation() {
    let engine = engine();
    let outcome = engine.process(&raw(
        1,
        &[("product_id", "P1"), ("has_image", "1"), ("image_path", "")],
    ));
    let codes: Vec<ViolationCode> = outcome.violations.iter().map(|v| v.code).collect();
    assert_eq!(codes, vec![ViolationCode::ImagePathMissing]);
}

#[test]
fn clean_record_is_accepted() {
    let engine = engine();
    let outcome = engine.process(&raw(
        1,
        &[
            ("product_id", " P1 "),
            ("nutriscore_letter", "B"),
            ("nova_group", "3.0"),
            ("fat_100g", "10 g"),
            ("saturated_fat_100g", "2"),
            ("allergens", "Milk"),
            ("allergens_cleaned", "en:milk"),
            ("countries_cleaned", "en:France, USA"),
        ],
    ));
    assert!(outcome.violations.is_empty(), "{:?}", outcome.violations);
    assert!(outcome.is_accepted(ValidationMode::Strict));
    assert_eq!(outcome.product_id.as_deref(), Some("P1"));

    let record = outcome.record.unwrap();
    assert_eq!(record.text("nutriscore_letter"), Some("b"));
    assert_eq!(record.text("nova_group"), Some("3"));
    assert_eq!(record.number("fat_100g"), Some(10.0));
    assert_eq!(
        record.get("countries_cleaned").unwrap().render(),
        "france|united states"
    );
}

#[test]
fn malformed_row_fails_the_record_only() {
    let engine = engine();
    let outcome = engine.process(
        &raw(4, &[("product_id", "P4")]).with_malformed("expected 3 fields, found 2"),
    );
    assert_eq!(outcome.state, RecordState::Failed);
    assert_eq!(outcome.fault.unwrap().kind, FaultKind::MalformedRow);
    assert!(outcome.violations.is_empty());
    assert!(outcome.record.is_none());
}

#[test]
fn undeclared_field_policy() {
    let record = raw(1, &[("product_id", "P1"), ("colour", "red")]);

    let outcome = engine().process(&record);
    assert_eq!(outcome.state, RecordState::Failed);
    let fault = outcome.fault.unwrap();
    assert_eq!(fault.kind, FaultKind::UndeclaredField);
    assert!(fault.message.contains("colour"));

    let config = EngineConfig::default().with_unknown_fields(UnknownFieldPolicy::PassThrough);
    let outcome = Engine::with_config(config).unwrap().process(&record);
    assert_eq!(outcome.state, RecordState::Done);
    assert_eq!(outcome.record.unwrap().text("colour"), Some("red"));
}

#[test]
fn not_numeric_does_not_fail_the_record() {
    let outcome = engine().process(&raw(1, &[("product_id", "P1"), ("fat_100g", "n/a")]));
    assert_eq!(outcome.state, RecordState::Done);
    assert_eq!(outcome.violations[0].code, ViolationCode::NotNumeric);
    assert!(!outcome.record.unwrap().is_present("fat_100g"));
}

#[test]
fn provided_log_value_is_checked_against_its_source() {
    let config = EngineConfig::default().with_derive_log_fields(true);
    let engine = Engine::with_config(config).unwrap();
    let outcome = engine.process(&raw(
        1,
        &[
            ("product_id", "P1"),
            ("energy_kcal_100g", "0"),
            ("log_energy_kcal_100g", "4.2"),
        ],
    ));

    assert_eq!(outcome.state, RecordState::Done);
    assert!(
        outcome
            .violations
            .iter()
            .any(|v| v.code == ViolationCode::LogInconsistent)
    );
    assert!(!outcome.is_accepted(ValidationMode::Lenient));
    let record = outcome.record.unwrap();
    assert_eq!(record.number("log_energy_kcal_100g"), Some(4.2));
}

#[test]
fn mixed_unknown_encodings_fail_the_dataset() {
    let records = vec![
        raw(1, &[("product_id", "A"), ("nutriscore_letter", "0")]),
        raw(2, &[("product_id", "B"), ("nutriscore_letter", "")]),
    ];
    let result = engine().check(&records, |_| {});
    assert!(!result.report.passed());
    assert_eq!(result.report.count(ViolationCode::InvalidCategory), 1);
    assert!(result.outcomes[0].violations.is_empty());
    let blank = result.outcomes[1].record.as_ref().unwrap();
    assert!(!blank.is_present("nutriscore_letter"));

    let config = EngineConfig::default().with_unknown_sentinel(UnknownSentinel::Empty);
    let result = Engine::with_config(config).unwrap().check(&records, |_| {});
    assert_eq!(result.report.count(ViolationCode::InvalidCategory), 1);
    assert!(result.outcomes[1].violations.is_empty());
}

#[test]
fn duplicates_are_grouped_once() {
    let engine = engine();
    let records = vec![
        raw(1, &[("product_id", "X"), ("brand", "A")]),
        raw(2, &[("product_id", "Y")]),
        raw(3, &[("product_id", "X"), ("brand", "B")]),
    ];
    let seen = AtomicUsize::new(0);
    let result = engine.check(&records, |_| {
        seen.fetch_add(1, Ordering::Relaxed);
    });

    assert_eq!(seen.load(Ordering::Relaxed), 3);
    assert_eq!(result.report.duplicate_groups.len(), 1);
    assert_eq!(result.report.duplicate_groups[0].rows, vec![1, 3]);
    assert_eq!(result.report.totals.accepted, 1);
    assert_eq!(result.report.totals.rejected, 2);

    let rows: Vec<usize> = result.outcomes.iter().map(|o| o.row).collect();
    assert_eq!(rows, vec![1, 2, 3]);
    assert!(
        result.outcomes[2]
            .violations
            .iter()
            .any(|v| v.code == ViolationCode::DuplicateProductId)
    );
}

#[test]
fn duplicates_are_grouped_by_position_not_row() {
    let engine = engine();
    let records = vec![
        raw(0, &[("product_id", "X")]),
        raw(0, &[("product_id", "X")]),
    ];
    let result = engine.check(&records, |_| {});

    assert_eq!(result.report.duplicate_groups.len(), 1);
    assert_eq!(result.report.duplicate_groups[0].positions, vec![0, 1]);
    assert_eq!(result.report.totals.accepted, 0);
    assert_eq!(result.report.totals.rejected, 2);
    assert!(!result.report.passed());
    assert!(result.outcomes.iter().all(|outcome| {
        outcome
            .violations
            .iter()
            .any(|v| v.code == ViolationCode::DuplicateProductId)
    }));
}

#[test]
fn allow_duplicate_ids_accepts_repeats() {
    let config = EngineConfig::default().with_allow_duplicate_ids(true);
    let engine = Engine::with_config(config).unwrap();
    let records = vec![raw(1, &[("product_id", "X")]), raw(2, &[("product_id", "X")])];
    let result = engine.check(&records, |_| {});
    assert!(result.report.duplicate_groups.is_empty());
    assert!(result.report.passed());
}

#[test]
fn invalid_config_aborts_before_processing() {
    let config = EngineConfig::default().with_allergen_vocabulary(Vec::<String>::new());
    let err = Engine::with_config(config).unwrap_err();
    assert!(matches!(
        err,
        EngineError::Config(ConfigError::EmptyAllergenVocabulary)
    ));
}

#[test]
fn missing_schema_file_aborts() {
    let standards = StandardsConfig::default().with_fields_path("/nonexistent/fields.csv");
    let err = Engine::new(EngineConfig::default(), standards).unwrap_err();
    assert!(matches!(err, EngineError::Schema(_)));
}

#[test]
fn processing_is_deterministic() {
    let engine = engine();
    let records: Vec<RawRecord> = (1..=50)
        .map(|row| {
            raw(
                row,
                &[
                    ("product_id", if row % 7 == 0 { "dup" } else { "id" }),
                    ("fat_100g", "3"),
                    ("saturated_fat_100g", if row % 3 == 0 { "4" } else { "1" }),
                ],
            )
        })
        .collect();
    let first = engine.check(&records, |_| {});
    let second = engine.check(&records, |_| {});
    assert_eq!(first.outcomes, second.outcomes);
    assert_eq!(first.report, second.report);
}

proptest! {
    #[test]
    fn renormalizing_a_record_is_a_no_op(
        fat in "[0-9]{1,3}(\\.[0-9]{1,2})?( g)?",
        nova in "[1-5](\\.0)?",
        allergens in "(en:)?(Milk|soja|wheat|celery)(, (en:)?(eggs|nuts|lait))?",
        text in "[A-Za-z ,.!]{0,20}",
    ) {
        let engine = engine();
        let first = engine.process(&raw(
            1,
            &[
                ("product_id", "P"),
                ("fat_100g", fat.as_str()),
                ("nova_group", nova.as_str()),
                ("allergens_cleaned", allergens.as_str()),
                ("ingredients_text_cleaned", text.as_str()),
            ],
        ));
        let normalized = first.record.clone().unwrap();
        let second = engine.process(&normalized.to_raw());
        prop_assert_eq!(second.record.unwrap(), normalized);
        prop_assert_eq!(second.violations, first.violations);
    }

    #[test]
    fn accepted_records_satisfy_range_invariants(
        fat in -5.0f64..50.0,
        sugar_ratio in -0.5f64..1.5,
    ) {
        let engine = engine();
        let fat_text = fat.to_string();
        let ratio_text = sugar_ratio.to_string();
        let outcome = engine.process(&raw(
            1,
            &[("product_id", "P"), ("fat_100g", fat_text.as_str()), ("sugar_ratio", ratio_text.as_str())],
        ));
        if outcome.is_accepted(ValidationMode::Lenient) {
            let record = outcome.record.unwrap();
            for field in engine.schema().fields() {
                let Some(value) = record.number(&field.name) else { continue };
                if field.kind == FieldKind::Ratio {
                    prop_assert!((0.0..=1.0).contains(&value));
                } else if field.group == "nutrition" {
                    prop_assert!(value >= 0.0);
                }
            }
        }
    }
}
