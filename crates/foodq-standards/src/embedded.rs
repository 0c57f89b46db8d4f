//! Embedded schema tables.
//!
//! The field table and vocabularies are compiled into the binary with
//! `include_str!()` so the engine runs without locating data files.

/// Field table: one row per column of the product dataset.
pub const FIELDS: &str = include_str!("../data/fields.csv");

/// Vocabulary index: name, extensibility, separator and token pattern.
pub const VOCABULARIES: &str = include_str!("../data/vocabulary/vocabularies.csv");

/// Allergen terms and synonyms.
pub const ALLERGENS: &str = include_str!("../data/vocabulary/allergens.csv");

/// Country terms and synonyms.
pub const COUNTRIES: &str = include_str!("../data/vocabulary/countries.csv");

/// Term tables by vocabulary name. Vocabularies without an entry here are
/// pattern-only.
pub fn term_files() -> &'static [(&'static str, &'static str)] {
    &[("allergens", ALLERGENS), ("countries", COUNTRIES)]
}
