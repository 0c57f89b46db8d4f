//! Violation codes and the record-level violation type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Violation severity.
///
/// Advisories are reported but only reject a record in strict validation mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Advisory,
}

impl Severity {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "advisory" | "warning" => Some(Self::Advisory),
            _ => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Advisory => "advisory",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies which rule a violation comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    // Field checks
    OutOfRange,
    InvalidCategory,
    NotNumeric,
    NotBinary,
    RequiredMissing,
    // Cross-field rules
    FatInconsistent,
    ImagePathMissing,
    #[serde(rename = "IMAGE_160_PATH_MISSING")]
    Image160PathMissing,
    AllergenSourceAmbiguous,
    RatioOutOfBounds,
    SugarsInconsistent,
    AdditivesCountMismatch,
    LogInconsistent,
    // Dataset checks
    DuplicateProductId,
}

impl ViolationCode {
    pub const fn all() -> &'static [Self] {
        &[
            Self::OutOfRange,
            Self::InvalidCategory,
            Self::NotNumeric,
            Self::NotBinary,
            Self::RequiredMissing,
            Self::FatInconsistent,
            Self::ImagePathMissing,
            Self::Image160PathMissing,
            Self::AllergenSourceAmbiguous,
            Self::RatioOutOfBounds,
            Self::SugarsInconsistent,
            Self::AdditivesCountMismatch,
            Self::LogInconsistent,
            Self::DuplicateProductId,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OutOfRange => "OUT_OF_RANGE",
            Self::InvalidCategory => "INVALID_CATEGORY",
            Self::NotNumeric => "NOT_NUMERIC",
            Self::NotBinary => "NOT_BINARY",
            Self::RequiredMissing => "REQUIRED_MISSING",
            Self::FatInconsistent => "FAT_INCONSISTENT",
            Self::ImagePathMissing => "IMAGE_PATH_MISSING",
            Self::Image160PathMissing => "IMAGE_160_PATH_MISSING",
            Self::AllergenSourceAmbiguous => "ALLERGEN_SOURCE_AMBIGUOUS",
            Self::RatioOutOfBounds => "RATIO_OUT_OF_BOUNDS",
            Self::SugarsInconsistent => "SUGARS_INCONSISTENT",
            Self::AdditivesCountMismatch => "ADDITIVES_COUNT_MISMATCH",
            Self::LogInconsistent => "LOG_INCONSISTENT",
            Self::DuplicateProductId => "DUPLICATE_PRODUCT_ID",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_ascii_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|code| code.as_str() == wanted)
    }

    /// Severity used when the rule registry does not override it.
    pub const fn default_severity(&self) -> Severity {
        match self {
            Self::SugarsInconsistent | Self::AdditivesCountMismatch => Severity::Advisory,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ViolationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a violation is about.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum Scope {
    /// A single field.
    Field(String),
    /// Several fields of the same record.
    Fields(Vec<String>),
    /// The record as a whole (e.g. its identity within the dataset).
    Record,
}

impl Scope {
    pub fn fields<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fields(names.into_iter().map(Into::into).collect())
    }

    /// True when the scope covers `field`.
    pub fn mentions(&self, field: &str) -> bool {
        match self {
            Self::Field(name) => name == field,
            Self::Fields(names) => names.iter().any(|name| name == field),
            Self::Record => false,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Field(name) => f.write_str(name),
            Self::Fields(names) => f.write_str(&names.join("+")),
            Self::Record => f.write_str("record"),
        }
    }
}

/// A detected rule failure. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub scope: Scope,
    pub code: ViolationCode,
    pub severity: Severity,
    pub message: String,
}

impl Violation {
    pub fn new(scope: Scope, code: ViolationCode, message: impl Into<String>) -> Self {
        Self {
            scope,
            code,
            severity: code.default_severity(),
            message: message.into(),
        }
    }

    /// Violation on a single field.
    pub fn field(name: impl Into<String>, code: ViolationCode, message: impl Into<String>) -> Self {
        Self::new(Scope::Field(name.into()), code, message)
    }

    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
