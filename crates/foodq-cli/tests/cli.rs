//! Tests for configuration loading, the check run and summary rendering.

use std::path::PathBuf;

use comfy_table::ContentArrangement;
use foodq_cli::config::{ConfigOverrides, load_config, parse_config};
use foodq_cli::logging::{REDACTED_VALUE, default_directives, log_data_enabled, redact_value};
use foodq_cli::pipeline::{CheckRequest, output_headers, run_check};
use foodq_cli::summary::{fields_table, histogram_table, totals_table};
use foodq_model::{
    EngineConfig, MatchingMode, UnknownFieldPolicy, UnknownSentinel, ValidationMode, ViolationCode,
};
use foodq_standards::SchemaRegistry;
use indicatif::ProgressBar;
use tempfile::{TempDir, tempdir};
use tracing::level_filters::LevelFilter;

const DATASET: &str = "\
product_id,product_name,fat_100g,saturated_fat_100g,has_image,image_path
P1,Oat Bar,5,8,0,
P2,Milk,3.5,2,1,img/p2.jpg
P2,Milk copy,3.5,2,0,
P3,Broken,1
";

fn dataset_dir() -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let input = dir.path().join("products.csv");
    std::fs::write(&input, DATASET).unwrap();
    (dir, input)
}

fn request(input: PathBuf) -> CheckRequest {
    CheckRequest {
        input,
        schema: None,
        output: None,
        violations: None,
        config: EngineConfig::default(),
    }
}

#[test]
fn parse_config_reads_partial_file() {
    let config = parse_config(
        r#"
allow_duplicate_ids = true
validation_mode = "strict"
"#,
    )
    .unwrap();
    assert!(config.allow_duplicate_ids);
    assert_eq!(config.validation_mode, ValidationMode::Strict);
    assert_eq!(config.unknown_label_sentinel, UnknownSentinel::Zero);
}

#[test]
fn load_config_defaults_without_file() {
    assert_eq!(load_config(None).unwrap(), EngineConfig::default());
}

#[test]
fn load_config_names_the_file_on_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foodq.toml");
    std::fs::write(&path, "allow_dupes = true\n").unwrap();
    let err = load_config(Some(&path)).unwrap_err();
    assert!(format!("{err:#}").contains("foodq.toml"));
}

#[test]
fn overrides_only_apply_present_flags() {
    let base = EngineConfig::default().with_allow_duplicate_ids(true);
    assert_eq!(ConfigOverrides::default().apply(base.clone()), base);

    let overrides = ConfigOverrides {
        unknown_sentinel: Some(UnknownSentinel::Empty),
        lenient_numeric: true,
        strict: true,
        pass_through_unknown: true,
        derive_log_fields: true,
        ..ConfigOverrides::default()
    };
    let config = overrides.apply(EngineConfig::default());
    assert_eq!(config.unknown_label_sentinel, UnknownSentinel::Empty);
    assert!(!config.strict_numeric_parse);
    assert_eq!(config.validation_mode, ValidationMode::Strict);
    assert_eq!(config.matching_mode, MatchingMode::Strict);
    assert_eq!(config.unknown_fields, UnknownFieldPolicy::PassThrough);
    assert!(config.derive_log_fields);
    assert!(!config.allow_duplicate_ids);
}

#[test]
fn output_headers_use_canonical_names_and_append_derived() {
    let schema = SchemaRegistry::load_default().unwrap();
    let headers = vec![
        "Product_ID".to_string(),
        "fat_100g".to_string(),
        "salt_100g".to_string(),
    ];
    let plain = output_headers(&schema, &EngineConfig::default(), &headers);
    assert_eq!(plain, vec!["product_id", "fat_100g", "salt_100g"]);

    let derived = output_headers(
        &schema,
        &EngineConfig::default().with_derive_log_fields(true),
        &headers,
    );
    assert_eq!(
        derived,
        vec![
            "product_id",
            "fat_100g",
            "salt_100g",
            "log_energy_kcal_100g",
            "log_salt_100g"
        ]
    );
}

#[test]
fn check_run_reports_and_writes_outputs() {
    let (dir, input) = dataset_dir();
    let output = dir.path().join("normalized.csv");
    let violations = dir.path().join("violations.csv");
    let request = CheckRequest {
        output: Some(output.clone()),
        violations: Some(violations.clone()),
        ..request(input)
    };

    let run = run_check(&request, &ProgressBar::hidden()).unwrap();
    let report = &run.report;
    assert_eq!(report.totals.records, 4);
    assert_eq!(report.totals.failed, 1);
    assert_eq!(report.totals.accepted, 0);
    assert_eq!(report.count(ViolationCode::FatInconsistent), 1);
    assert_eq!(report.count(ViolationCode::DuplicateProductId), 2);
    assert_eq!(report.duplicate_groups.len(), 1);
    assert_eq!(report.duplicate_groups[0].rows, vec![2, 3]);
    assert!(!report.passed());

    let normalized = run.normalized.as_ref().unwrap();
    assert_eq!(normalized.rows, 3);
    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(
        content.lines().next(),
        Some("product_id,product_name,fat_100g,saturated_fat_100g,has_image,image_path")
    );
    assert!(!content.contains("Broken"));

    let expected_lines: usize = run
        .outcomes
        .iter()
        .map(|outcome| outcome.violations.len() + usize::from(outcome.fault.is_some()))
        .sum();
    assert_eq!(run.violations.as_ref().unwrap().rows, expected_lines);
    let listing = std::fs::read_to_string(&violations).unwrap();
    assert!(listing.contains("MALFORMED_ROW"));
    assert!(listing.contains("DUPLICATE_PRODUCT_ID"));
}

#[test]
fn allow_duplicate_ids_clears_duplicate_groups() {
    let (_dir, input) = dataset_dir();
    let request = CheckRequest {
        config: EngineConfig::default().with_allow_duplicate_ids(true),
        ..request(input)
    };
    let run = run_check(&request, &ProgressBar::hidden()).unwrap();
    assert!(run.report.duplicate_groups.is_empty());
    assert_eq!(run.report.count(ViolationCode::DuplicateProductId), 0);
}

#[test]
fn missing_input_is_an_error() {
    let dir = tempdir().unwrap();
    let err = run_check(&request(dir.path().join("absent.csv")), &ProgressBar::hidden())
        .unwrap_err();
    assert!(format!("{err:#}").contains("absent.csv"));
}

#[test]
fn invalid_config_fails_before_reading() {
    let (_dir, input) = dataset_dir();
    let request = CheckRequest {
        config: EngineConfig::default().with_allergen_vocabulary(Vec::<String>::new()),
        ..request(input)
    };
    let err = run_check(&request, &ProgressBar::hidden()).unwrap_err();
    assert!(format!("{err:#}").contains("initialize engine"));
}

#[test]
fn summary_tables_list_codes_and_totals() {
    let (_dir, input) = dataset_dir();
    let run = run_check(&request(input), &ProgressBar::hidden()).unwrap();

    let mut histogram = histogram_table(&run.report);
    histogram.set_content_arrangement(ContentArrangement::Disabled);
    let histogram = histogram.to_string();
    assert!(histogram.contains("FAT_INCONSISTENT"));
    assert!(histogram.contains("DUPLICATE_PRODUCT_ID"));
    assert!(histogram.contains("MALFORMED_ROW"));

    let totals = totals_table(&run.report).to_string();
    assert!(totals.contains("Accepted"));
    assert!(totals.contains("Advisories"));
}

#[test]
fn fields_table_lists_schema() {
    let schema = SchemaRegistry::load_default().unwrap();
    let mut table = fields_table(&schema);
    table.set_content_arrangement(ContentArrangement::Disabled);
    let table = table.to_string();
    assert!(table.contains("product_id"));
    assert!(table.contains("vocabulary: allergens"));
    assert!(table.contains("log of salt_100g"));
}

#[test]
fn default_filter_directives() {
    insta::assert_snapshot!(
        default_directives(LevelFilter::INFO),
        @"warn,foodq=info,foodq_cli=info,foodq_core=info,foodq_ingest=info,foodq_model=info,foodq_normalize=info,foodq_report=info,foodq_standards=info,foodq_validate=info"
    );
}

#[test]
fn values_are_redacted_by_default() {
    assert!(!log_data_enabled());
    assert_eq!(redact_value("Oat Bar"), REDACTED_VALUE);
}
