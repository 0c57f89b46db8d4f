//! Field kinds and domain descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic kind of a dataset column. Decides how a raw value is normalized
/// and which field checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Kept as provided.
    FreeText,
    /// Lowercased, whitespace and punctuation runs collapsed.
    CleanedText,
    /// One of a fixed set of lowercase labels.
    Categorical,
    /// One of a fixed set of integer codes.
    Code,
    Numeric,
    /// Numeric share, bounded by the ratio rule rather than the field check.
    Ratio,
    /// `0` or `1`.
    Binary,
    /// ASCII digits only.
    Digits,
    /// Tokens from a vocabulary.
    MultiValue,
    /// Passed through byte-for-byte.
    Opaque,
}

impl FieldKind {
    pub const fn all() -> &'static [Self] {
        &[
            Self::FreeText,
            Self::CleanedText,
            Self::Categorical,
            Self::Code,
            Self::Numeric,
            Self::Ratio,
            Self::Binary,
            Self::Digits,
            Self::MultiValue,
            Self::Opaque,
        ]
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FreeText => "free_text",
            Self::CleanedText => "cleaned_text",
            Self::Categorical => "categorical",
            Self::Code => "code",
            Self::Numeric => "numeric",
            Self::Ratio => "ratio",
            Self::Binary => "binary",
            Self::Digits => "digits",
            Self::MultiValue => "multi_value",
            Self::Opaque => "opaque",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let wanted = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == wanted)
    }

    /// Kinds whose normalized value is a number.
    pub const fn is_numeric(&self) -> bool {
        matches!(self, Self::Numeric | Self::Ratio)
    }

    /// Kinds validated against an allowed-value set.
    pub const fn has_allowed_values(&self) -> bool {
        matches!(self, Self::Categorical | Self::Code)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive numeric bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Values must be whole numbers.
    pub integer: bool,
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Human-readable form, e.g. `[0, 1]` or `>= 0`.
    pub fn describe(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("[{min}, {max}]"),
            (Some(min), None) => format!(">= {min}"),
            (None, Some(max)) => format!("<= {max}"),
            (None, None) => "any".to_string(),
        }
    }
}

/// Domain descriptor for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDomain {
    pub name: String,
    /// Attribute group (identity, nutrition, labels, ...).
    pub group: String,
    pub kind: FieldKind,
    /// Unit suffix stripped before numeric parsing.
    pub unit: Option<String>,
    pub nullable: bool,
    /// Allowed values for categorical and code fields.
    pub allowed: Vec<String>,
    pub range: NumericRange,
    /// Vocabulary name for multi-value fields.
    pub vocabulary: Option<String>,
    /// Source field for log-transformed fields.
    pub source: Option<String>,
    pub description: String,
}

impl FieldDomain {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            group: String::new(),
            kind,
            unit: None,
            nullable: true,
            allowed: Vec::new(),
            range: NumericRange::default(),
            vocabulary: None,
            source: None,
            description: String::new(),
        }
    }

    pub fn is_required(&self) -> bool {
        !self.nullable
    }

    pub fn allows(&self, value: &str) -> bool {
        self.allowed.iter().any(|allowed| allowed == value)
    }

    /// True for `log_*` fields computed from another column.
    pub fn is_derived(&self) -> bool {
        self.source.is_some()
    }
}
