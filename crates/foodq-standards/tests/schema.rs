//! Tests for the schema registry and vocabularies.

use std::collections::BTreeSet;
use std::io::Write;

use foodq_model::ListSeparator;
use foodq_standards::loader::load_vocabularies;
use foodq_standards::{
    FieldKind, SchemaError, SchemaRegistry, StandardsConfig, Vocabulary, term_key,
};

fn default_allergens() -> BTreeSet<String> {
    StandardsConfig::default().allergen_vocabulary
}

fn registry_from(content: &str) -> Result<SchemaRegistry, SchemaError> {
    let allergens = default_allergens();
    let vocabularies = load_vocabularies(&allergens)?;
    SchemaRegistry::from_csv(content, "test.csv", vocabularies, &allergens)
}

const HEADER: &str =
    "Field,Group,Kind,Unit,Nullable,Allowed,Min,Max,Integer,Vocabulary,Source,Description\n";

#[test]
fn embedded_schema_loads() {
    let registry = SchemaRegistry::load_default().unwrap();
    assert!(registry.len() > 40);
    assert_eq!(registry.fingerprint().len(), 64);

    let nova = registry.lookup("nova_group").unwrap();
    assert_eq!(nova.kind, FieldKind::Code);
    assert_eq!(nova.allowed, vec!["1", "2", "3", "4"]);

    let fat = registry.lookup("fat_100g").unwrap();
    assert_eq!(fat.unit.as_deref(), Some("g"));
    assert_eq!(fat.range.min, Some(0.0));

    let log = registry.lookup("log_salt_100g").unwrap();
    assert_eq!(log.source.as_deref(), Some("salt_100g"));

    assert!(registry.lookup("product_id").unwrap().is_required());
}

#[test]
fn lookup_is_case_insensitive() {
    let registry = SchemaRegistry::load_default().unwrap();
    assert_eq!(registry.lookup("FAT_100G").unwrap().name, "fat_100g");
    assert_eq!(registry.canonical_name(" Product_ID "), Some("product_id"));
}

#[test]
fn unknown_field_lookup_fails() {
    let registry = SchemaRegistry::load_default().unwrap();
    let err = registry.lookup("colour").unwrap_err();
    assert_eq!(err.field, "colour");
    insta::assert_snapshot!(err.to_string(), @"field 'colour' is not declared in the schema");
}

#[test]
fn ratio_fields_carry_unit_interval() {
    let registry = SchemaRegistry::load_default().unwrap();
    for name in ["sugar_ratio", "protein_ratio"] {
        let field = registry.lookup(name).unwrap();
        assert_eq!(field.kind, FieldKind::Ratio);
        assert!(field.range.contains(0.0));
        assert!(field.range.contains(1.0));
        assert!(!field.range.contains(1.2));
        assert_eq!(field.range.describe(), "[0, 1]");
    }
}

#[test]
fn allergen_vocabulary_resolves_synonyms() {
    let registry = SchemaRegistry::load_default().unwrap();
    let allergens = registry.vocabularies().get("allergens").unwrap();
    assert!(!allergens.extensible);
    assert_eq!(allergens.resolve("Wheat"), Some("gluten"));
    assert_eq!(allergens.resolve("soja"), Some("soybeans"));
    assert_eq!(allergens.resolve("tree_nuts"), Some("tree_nuts"));
    assert_eq!(allergens.resolve("lupin"), None);
    assert_eq!(allergens.len(), 9);
}

#[test]
fn additive_vocabulary_is_pattern_based() {
    let registry = SchemaRegistry::load_default().unwrap();
    let additives = registry.vocabularies().get("additives").unwrap();
    assert_eq!(additives.separator, ListSeparator::Space);
    assert!(additives.is_valid("e300"));
    assert!(additives.is_valid("e150d"));
    assert!(!additives.is_valid("e30"));
    assert!(!additives.is_valid("vitamin c"));
}

#[test]
fn embedded_vocabulary_index_is_fully_loaded() {
    let registry = SchemaRegistry::load_default().unwrap();
    let vocabularies = registry.vocabularies();
    assert_eq!(vocabularies.len(), 3);
    for name in ["allergens", "countries", "additives"] {
        assert!(vocabularies.contains(name), "missing vocabulary {name}");
    }
    let additives = vocabularies.get("additives").unwrap();
    assert_eq!(additives.pattern().map(|p| p.as_str()), Some("^e[0-9]{3,4}[a-z]?$"));
}

#[test]
fn configured_allergen_set_restricts_and_extends() {
    let allergens: BTreeSet<String> = ["milk", "lupin"].iter().map(|s| s.to_string()).collect();
    let config = StandardsConfig::default().with_allergen_vocabulary(allergens);
    let registry = SchemaRegistry::load(&config).unwrap();
    let vocabulary = registry.vocabularies().get("allergens").unwrap();

    assert_eq!(vocabulary.terms().collect::<Vec<_>>(), vec!["lupin", "milk"]);
    assert_eq!(vocabulary.resolve("lait"), Some("milk"));
    assert_eq!(vocabulary.resolve("wheat"), None);
    assert_ne!(
        registry.fingerprint(),
        SchemaRegistry::load_default().unwrap().fingerprint()
    );
}

#[test]
fn fingerprint_is_stable() {
    let a = SchemaRegistry::load_default().unwrap();
    let b = SchemaRegistry::load_default().unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());
}

#[test]
fn custom_schema_file_is_used() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        "{HEADER}product_id,identity,free_text,,no,,,,,,,Key\nfat_100g,nutrition,numeric,g,yes,,0,,,,,Fat\n"
    )
    .unwrap();
    let config = StandardsConfig::default().with_fields_path(file.path());
    let registry = SchemaRegistry::load(&config).unwrap();
    assert_eq!(registry.len(), 2);
    assert!(!registry.contains("sugars_100g"));
}

#[test]
fn rejects_unknown_kind() {
    let err = registry_from(&format!("{HEADER}product_id,identity,blob,,no,,,,,,,\n")).unwrap_err();
    assert!(matches!(err, SchemaError::InvalidValue { column: "Kind", .. }));
}

#[test]
fn rejects_inverted_bounds() {
    let err = registry_from(&format!(
        "{HEADER}product_id,identity,free_text,,no,,,,,,,\nx,derived,numeric,,yes,,5,1,,,,\n"
    ))
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidField { .. }));
}

#[test]
fn rejects_unparseable_bound() {
    let err = registry_from(&format!(
        "{HEADER}product_id,identity,free_text,,no,,,,,,,\nx,derived,numeric,,yes,,low,,,,,\n"
    ))
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidValue { column: "Min", .. }));
}

#[test]
fn rejects_categorical_without_values() {
    let err = registry_from(&format!(
        "{HEADER}product_id,identity,free_text,,no,,,,,,,\ngrade,labels,categorical,,yes,,,,,,,\n"
    ))
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidField { .. }));
}

#[test]
fn rejects_duplicate_names() {
    let err = registry_from(&format!(
        "{HEADER}product_id,identity,free_text,,no,,,,,,,\nPRODUCT_ID,identity,free_text,,no,,,,,,,\n"
    ))
    .unwrap_err();
    assert!(matches!(err, SchemaError::DuplicateField { .. }));
}

#[test]
fn rejects_unknown_vocabulary() {
    let err = registry_from(&format!(
        "{HEADER}product_id,identity,free_text,,no,,,,,,,\ntags,x,multi_value,,yes,,,,,labels,,\n"
    ))
    .unwrap_err();
    assert!(matches!(err, SchemaError::UnknownVocabulary { .. }));
}

#[test]
fn rejects_missing_key_field() {
    let err = registry_from(&format!("{HEADER}brand,identity,free_text,,yes,,,,,,,\n")).unwrap_err();
    assert!(matches!(err, SchemaError::MissingKeyField { field: "product_id" }));
}

#[test]
fn rejects_non_numeric_log_source() {
    let err = registry_from(&format!(
        "{HEADER}product_id,identity,free_text,,no,,,,,,,\nlog_brand,x,numeric,,yes,,,,,,product_id,\n"
    ))
    .unwrap_err();
    assert!(matches!(err, SchemaError::InvalidField { .. }));
}

#[test]
fn term_keys_are_normalized() {
    assert_eq!(term_key("  Tree   Nuts "), "tree nuts");
    let mut vocabulary = Vocabulary::new("demo", true, ListSeparator::Pipe);
    vocabulary.add_synonym("USA", "United  States");
    assert_eq!(vocabulary.resolve("usa"), Some("united states"));
    assert!(vocabulary.is_valid("united states"));
    assert!(!vocabulary.is_valid("usa"));
}

#[test]
fn mentions_match_whole_words_only() {
    let registry = SchemaRegistry::load_default().unwrap();
    let allergens = registry.vocabularies().get("allergens").unwrap();

    let found = allergens.mentions("Contains: MILK proteins, wheat flour and   tree nuts.");
    assert_eq!(
        found.into_iter().collect::<Vec<_>>(),
        vec!["gluten", "milk", "tree_nuts"]
    );
    assert!(allergens.mentions("peanuts").contains("peanuts"));
    assert!(!allergens.mentions("peanuts").contains("tree_nuts"));
    assert!(allergens.mentions("buttermilk").is_empty());

    let mut vocabulary = Vocabulary::new("demo", false, ListSeparator::Pipe);
    assert!(vocabulary.mentions("milk").is_empty());
    vocabulary.add_term("milk");
    assert_eq!(vocabulary.mentions("semi milk").len(), 1);
}
