//! Tests for value and record normalization.

use foodq_model::{EngineConfig, FieldValue, ListSeparator, MatchingMode, RawRecord, ViolationCode};
use foodq_normalize::text::{clean_text, code};
use foodq_normalize::{
    NormalizeError, Normalizer, compact_key, derive_log, normalize_list, parse_numeric,
    resolve_token, split_tokens,
};
use foodq_standards::SchemaRegistry;
use proptest::prelude::*;

fn schema() -> SchemaRegistry {
    SchemaRegistry::load_default().unwrap()
}

fn normalize_one(schema: &SchemaRegistry, config: &EngineConfig, field: &str, raw: &str) -> FieldValue {
    let normalizer = Normalizer::new(schema, config);
    normalizer
        .normalize_field(schema.lookup(field).unwrap(), raw)
        .unwrap()
}

#[test]
fn clean_text_collapses_runs() {
    assert_eq!(clean_text("  Sugar,,  Cocoa BUTTER!!! "), "sugar, cocoa butter!");
    assert_eq!(clean_text("a.-b"), "a.b");
    assert_eq!(clean_text("\t\n"), "");
}

#[test]
fn code_renders_integral_floats() {
    assert_eq!(code("3.0"), FieldValue::Text("3".to_string()));
    assert_eq!(code(" 4 "), FieldValue::Text("4".to_string()));
    assert_eq!(code("2.5"), FieldValue::Text("2.5".to_string()));
    assert_eq!(code(""), FieldValue::Missing);
}

#[test]
fn code_spellings_of_one_integer_agree() {
    for spelling in ["3", "03", "+3", " 003 ", "3.0", "+3.00"] {
        assert_eq!(code(spelling), FieldValue::Text("3".to_string()), "{spelling}");
    }
    assert_eq!(code("-0"), FieldValue::Text("0".to_string()));
    assert_eq!(code("x3"), FieldValue::Text("x3".to_string()));
}

#[test]
fn numeric_strips_declared_unit_and_percent() {
    assert_eq!(parse_numeric(" 5 g ", Some("g"), true), Ok(Some(5.0)));
    assert_eq!(parse_numeric("5G", Some("g"), true), Ok(Some(5.0)));
    assert_eq!(parse_numeric("12%", None, true), Ok(Some(12.0)));
    assert_eq!(parse_numeric("", Some("g"), true), Ok(None));
    assert_eq!(
        parse_numeric("5 mg", Some("g"), true),
        Err(NormalizeError::NotNumeric {
            value: "5 mg".to_string()
        })
    );
    assert_eq!(
        parse_numeric("250 kcal", Some("g"), true),
        Err(NormalizeError::NotNumeric {
            value: "250 kcal".to_string()
        })
    );
}

#[test]
fn numeric_rejects_non_finite() {
    assert!(matches!(
        parse_numeric("inf", None, true),
        Err(NormalizeError::NonFinite { .. })
    ));
    assert!(matches!(
        parse_numeric("NaN", None, true),
        Err(NormalizeError::NonFinite { .. })
    ));
}

#[test]
fn lenient_numeric_accepts_decimal_comma_and_null_literals() {
    assert_eq!(parse_numeric("5,2", None, false), Ok(Some(5.2)));
    assert_eq!(parse_numeric("null", None, false), Ok(None));
    assert_eq!(parse_numeric("None", None, false), Ok(None));
    assert!(parse_numeric("5,2", None, true).is_err());
    assert!(parse_numeric("1,000,5", None, false).is_err());
}

#[test]
fn lenient_numeric_rejects_thousands_separator_lookalikes() {
    for ambiguous in ["1,000", "12,500 g", "-2,250"] {
        assert_eq!(
            parse_numeric(ambiguous, Some("g"), false),
            Err(NormalizeError::NotNumeric {
                value: ambiguous.to_string()
            }),
            "{ambiguous}"
        );
    }
    assert_eq!(parse_numeric("1,5", None, false), Ok(Some(1.5)));
    assert_eq!(parse_numeric("1,25", None, false), Ok(Some(1.25)));
    assert_eq!(parse_numeric("1,0005", None, false), Ok(Some(1.0005)));
}

#[test]
fn log_is_derived_only_from_positive_values() {
    assert_eq!(derive_log(Some(1.0)), Some(0.0));
    assert_eq!(derive_log(Some(0.0)), None);
    assert_eq!(derive_log(Some(-2.0)), None);
    assert_eq!(derive_log(None), None);
}

#[test]
fn split_tokens_strips_prefixes_and_separators() {
    assert_eq!(
        split_tokens("en:Milk, EN:gluten;  tree   nuts|", ListSeparator::Pipe),
        vec!["milk", "gluten", "tree nuts"]
    );
    assert_eq!(
        split_tokens("E300 e330,en:e150d", ListSeparator::Space),
        vec!["e300", "e330", "e150d"]
    );
}

#[test]
fn allergen_list_is_canonicalized_and_deduplicated() {
    let schema = schema();
    let allergens = schema.vocabularies().get("allergens").unwrap();
    let value = normalize_list("en:wheat, milk, lait, Gluten", allergens, MatchingMode::Strict, 0.92);
    assert_eq!(value.render(), "gluten|milk");
}

#[test]
fn lenient_matching_uses_compact_key_and_similarity() {
    let schema = schema();
    let allergens = schema.vocabularies().get("allergens").unwrap();
    assert_eq!(compact_key("Tree-Nuts"), "treenuts");
    assert_eq!(
        resolve_token(allergens, "tree-nuts", MatchingMode::Lenient, 0.92).as_deref(),
        Some("tree_nuts")
    );
    assert_eq!(resolve_token(allergens, "tree-nuts", MatchingMode::Strict, 0.92), None);
    assert_eq!(
        resolve_token(allergens, "sulphites.", MatchingMode::Lenient, 0.92).as_deref(),
        Some("sulphites")
    );
    assert_eq!(
        resolve_token(allergens, "sulphitess", MatchingMode::Lenient, 0.92).as_deref(),
        Some("sulphites")
    );
    assert_eq!(resolve_token(allergens, "celery", MatchingMode::Lenient, 0.92), None);
}

#[test]
fn unknown_allergen_is_kept_for_the_validator() {
    let schema = schema();
    let allergens = schema.vocabularies().get("allergens").unwrap();
    let value = normalize_list("milk, celery", allergens, MatchingMode::Lenient, 0.92);
    assert_eq!(value.tokens(), ["milk".to_string(), "celery".to_string()]);
}

#[test]
fn additives_join_with_single_space() {
    let schema = schema();
    let config = EngineConfig::default();
    let value = normalize_one(&schema, &config, "additives_cleaned", "en:E300, en:e330 e300");
    assert_eq!(value.render(), "e300 e330");
}

#[test]
fn nutriscore_sentinel_is_not_rewritten() {
    let schema = schema();
    let config = EngineConfig::default();
    assert_eq!(normalize_one(&schema, &config, "nutriscore_letter", ""), FieldValue::Missing);
    assert_eq!(
        normalize_one(&schema, &config, "nutriscore_letter", "0"),
        FieldValue::Text("0".to_string())
    );
    assert_eq!(
        normalize_one(&schema, &config, "nutriscore_letter", " B "),
        FieldValue::Text("b".to_string())
    );
}

#[test]
fn record_normalization_reports_not_numeric() {
    let schema = schema();
    let config = EngineConfig::default();
    let normalizer = Normalizer::new(&schema, &config);
    let raw = RawRecord::new(7)
        .with_field("Product_ID", "P7")
        .with_field("fat_100g", "lots")
        .with_field("sugars_100g", "4.50 g");
    let output = normalizer.normalize_record(&raw);

    assert_eq!(output.faults.len(), 1);
    assert_eq!(output.faults[0].code, ViolationCode::NotNumeric);
    assert!(output.faults[0].scope.mentions("fat_100g"));
    assert!(!output.record.is_present("fat_100g"));
    assert_eq!(output.record.number("sugars_100g"), Some(4.5));
    assert_eq!(output.record.fields[0].0, "product_id");
}

#[test]
fn log_fields_are_filled_but_never_overwritten() {
    let schema = schema();
    let raw = RawRecord::new(1)
        .with_field("salt_100g", "1")
        .with_field("log_salt_100g", "")
        .with_field("energy_kcal_100g", "0")
        .with_field("log_energy_kcal_100g", "4.2");

    let deriving = EngineConfig::default().with_derive_log_fields(true);
    let output = Normalizer::new(&schema, &deriving).normalize_record(&raw);
    assert_eq!(output.record.number("log_salt_100g"), Some(0.0));
    assert_eq!(output.record.number("log_energy_kcal_100g"), Some(4.2));

    let plain = EngineConfig::default();
    let output = Normalizer::new(&schema, &plain).normalize_record(&raw);
    assert!(!output.record.is_present("log_salt_100g"));
    assert_eq!(output.record.number("log_energy_kcal_100g"), Some(4.2));
}

#[test]
fn provided_log_value_is_kept_without_its_source() {
    let schema = schema();
    let deriving = EngineConfig::default().with_derive_log_fields(true);

    let alone = RawRecord::new(1).with_field("log_salt_100g", "9");
    let output = Normalizer::new(&schema, &deriving).normalize_record(&alone);
    assert_eq!(output.record.number("log_salt_100g"), Some(9.0));

    let conflicting = RawRecord::new(1)
        .with_field("salt_100g", "1")
        .with_field("log_salt_100g", "9");
    let output = Normalizer::new(&schema, &deriving).normalize_record(&conflicting);
    assert_eq!(output.record.number("log_salt_100g"), Some(9.0));
}

#[test]
fn unparseable_log_value_is_not_replaced() {
    let schema = schema();
    let deriving = EngineConfig::default().with_derive_log_fields(true);
    let raw = RawRecord::new(1)
        .with_field("salt_100g", "2")
        .with_field("log_salt_100g", "abc");
    let output = Normalizer::new(&schema, &deriving).normalize_record(&raw);
    assert_eq!(output.faults.len(), 1);
    assert!(!output.record.is_present("log_salt_100g"));
}

#[test]
fn log_field_is_added_when_only_source_is_present() {
    let schema = schema();
    let raw = RawRecord::new(1).with_field("salt_100g", "2.5 g");
    let deriving = EngineConfig::default().with_derive_log_fields(true);
    let output = Normalizer::new(&schema, &deriving).normalize_record(&raw);
    assert_eq!(output.record.number("log_salt_100g"), Some(2.5f64.ln()));
    assert!(output.record.get("log_energy_kcal_100g").is_none());
}

#[test]
fn undeclared_fields_pass_through_verbatim() {
    let schema = schema();
    let config = EngineConfig::default();
    let raw = RawRecord::new(1).with_field("colour", " Red ");
    let output = Normalizer::new(&schema, &config).normalize_record(&raw);
    assert_eq!(output.record.text("colour"), Some(" Red "));
}

proptest! {
    #[test]
    fn empty_input_never_yields_a_value(
        index in 0usize..64,
        blank in "[ \t]{0,3}",
        derive in any::<bool>(),
    ) {
        let schema = schema();
        let fields = schema.fields();
        let domain = &fields[index % fields.len()];
        let config = EngineConfig::default()
            .with_derive_log_fields(derive)
            .with_strict_numeric_parse(false);
        let raw = RawRecord::new(1).with_field(domain.name.clone(), "");
        let output = Normalizer::new(&schema, &config).normalize_record(&raw);
        prop_assert!(!output.record.is_present(&domain.name));

        if domain.kind != foodq_standards::FieldKind::Opaque {
            let value = Normalizer::new(&schema, &config)
                .normalize_field(domain, &blank)
                .unwrap();
            prop_assert_eq!(value, FieldValue::Missing);
        }
    }

    #[test]
    fn text_normalization_is_idempotent(
        index in 0usize..64,
        raw in "[a-zA-Z0-9 :,;|._%-]{0,40}",
    ) {
        let schema = schema();
        let fields = schema.fields();
        let domain = &fields[index % fields.len()];
        let config = EngineConfig::default();
        let normalizer = Normalizer::new(&schema, &config);
        if let Ok(first) = normalizer.normalize_field(domain, &raw) {
            let second = normalizer.normalize_field(domain, &first.render()).unwrap();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn numeric_normalization_is_idempotent(value in -1.0e9f64..1.0e9) {
        let schema = schema();
        let config = EngineConfig::default();
        let first = normalize_one(&schema, &config, "fat_100g", &format!("{value} g"));
        let second = normalize_one(&schema, &config, "fat_100g", &first.render());
        prop_assert_eq!(first, second);
    }
}
