//! Configuration options for the quality engine.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Canonical allergen tokens recognised by default.
pub const DEFAULT_ALLERGENS: &[&str] = &[
    "gluten",
    "milk",
    "eggs",
    "fish",
    "peanuts",
    "tree_nuts",
    "soybeans",
    "sesame_seeds",
    "sulphites",
];

/// Encoding used for an unknown `nutriscore_letter`.
///
/// Applied to the whole dataset; never inferred per record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnknownSentinel {
    /// Unknown grades are written as `0`.
    #[default]
    #[serde(rename = "0")]
    Zero,
    /// Unknown grades are left empty; a literal `0` is an invalid grade.
    #[serde(rename = "")]
    Empty,
}

impl UnknownSentinel {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::Empty => "",
        }
    }
}

/// Whether advisory violations reject a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Advisories reject the record like errors do.
    Strict,
    /// Only error-severity violations reject the record.
    #[default]
    Lenient,
}

/// Mode for vocabulary matching of multi-value tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchingMode {
    /// Exact canonical or synonym matches only.
    Strict,
    /// Also match on alphanumeric-only keys and Jaro-Winkler similarity.
    #[default]
    Lenient,
}

/// What to do with a column the schema does not declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownFieldPolicy {
    /// The record fails with a structural fault.
    #[default]
    Fail,
    /// The value is carried through untouched and never validated.
    PassThrough,
}

/// Options controlling normalization, validation and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Treat repeated `product_id` values as intentional.
    pub allow_duplicate_ids: bool,

    /// Dataset-wide encoding of an unknown Nutri-Score grade.
    pub unknown_label_sentinel: UnknownSentinel,

    /// Canonical allergen tokens accepted in `allergens_cleaned`/`traces_cleaned`.
    /// Tokens not present in the bundled vocabulary table are added without synonyms.
    pub allergen_vocabulary: BTreeSet<String>,

    /// Only accept plain numbers (after unit and `%` stripping).
    /// When false, decimal commas are accepted and `nan`/`null`/`none` read as empty.
    pub strict_numeric_parse: bool,

    pub validation_mode: ValidationMode,

    pub matching_mode: MatchingMode,

    /// Minimum Jaro-Winkler similarity for a lenient vocabulary match.
    pub fuzzy_threshold: f64,

    pub unknown_fields: UnknownFieldPolicy,

    /// Compute `log_*` fields from their source columns.
    pub derive_log_fields: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            allow_duplicate_ids: false,
            unknown_label_sentinel: UnknownSentinel::default(),
            allergen_vocabulary: DEFAULT_ALLERGENS.iter().map(|s| (*s).to_string()).collect(),
            strict_numeric_parse: true,
            validation_mode: ValidationMode::default(),
            matching_mode: MatchingMode::default(),
            fuzzy_threshold: 0.92,
            unknown_fields: UnknownFieldPolicy::default(),
            derive_log_fields: false,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration where advisories reject records and vocabulary matching is exact.
    pub fn strict() -> Self {
        Self {
            validation_mode: ValidationMode::Strict,
            matching_mode: MatchingMode::Strict,
            ..Self::default()
        }
    }

    pub fn with_allow_duplicate_ids(mut self, enable: bool) -> Self {
        self.allow_duplicate_ids = enable;
        self
    }

    pub fn with_unknown_sentinel(mut self, sentinel: UnknownSentinel) -> Self {
        self.unknown_label_sentinel = sentinel;
        self
    }

    pub fn with_strict_numeric_parse(mut self, enable: bool) -> Self {
        self.strict_numeric_parse = enable;
        self
    }

    pub fn with_validation_mode(mut self, mode: ValidationMode) -> Self {
        self.validation_mode = mode;
        self
    }

    pub fn with_matching_mode(mut self, mode: MatchingMode) -> Self {
        self.matching_mode = mode;
        self
    }

    pub fn with_unknown_fields(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    pub fn with_derive_log_fields(mut self, enable: bool) -> Self {
        self.derive_log_fields = enable;
        self
    }

    pub fn with_allergen_vocabulary<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergen_vocabulary = tokens.into_iter().map(Into::into).collect();
        self
    }

    /// Check option values that serde cannot constrain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allergen_vocabulary.is_empty() {
            return Err(ConfigError::EmptyAllergenVocabulary);
        }
        if let Some(token) = self.allergen_vocabulary.iter().find(|token| {
            token.is_empty()
                || !token
                    .chars()
                    .all(|ch| ch.is_ascii_lowercase() || ch == '_')
        }) {
            return Err(ConfigError::InvalidAllergenToken(token.clone()));
        }
        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            return Err(ConfigError::InvalidFuzzyThreshold(self.fuzzy_threshold));
        }
        Ok(())
    }
}
