use thiserror::Error;

/// Rejected engine configuration.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("allergen vocabulary must contain at least one token")]
    EmptyAllergenVocabulary,
    #[error("invalid allergen token '{0}' (expected lowercase letters and underscores)")]
    InvalidAllergenToken(String),
    #[error("fuzzy threshold must be in (0, 1], got {0}")]
    InvalidFuzzyThreshold(f64),
}
