use std::fmt;

use serde::{Deserialize, Serialize};

use crate::options::ValidationMode;
use crate::record::NormalizedRecord;
use crate::violation::{Severity, Violation};

/// Processing state of a single record.
///
/// `Raw -> Normalized -> Validated -> ConsistencyChecked -> Done`, or `Failed`
/// when a structural fault stops field interpretation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecordState {
    Raw,
    Normalized,
    Validated,
    ConsistencyChecked,
    Done,
    Failed,
}

impl RecordState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    /// The state that follows `self` on the happy path.
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Raw => Some(Self::Normalized),
            Self::Normalized => Some(Self::Validated),
            Self::Validated => Some(Self::ConsistencyChecked),
            Self::ConsistencyChecked => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultKind {
    /// The reader could not split the row into the declared columns.
    MalformedRow,
    /// The row carries a column the schema does not declare.
    UndeclaredField,
}

impl FaultKind {
    /// Upper-case code used in violation listings.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MalformedRow => "MALFORMED_ROW",
            Self::UndeclaredField => "UNDECLARED_FIELD",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRow => f.write_str("malformed row"),
            Self::UndeclaredField => f.write_str("undeclared field"),
        }
    }
}

/// A fault that prevents a record from being interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralFault {
    pub kind: FaultKind,
    pub message: String,
}

impl fmt::Display for StructuralFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Result of running one record through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordOutcome {
    pub row: usize,
    pub state: RecordState,
    /// Trimmed `product_id`, when the row carries one.
    pub product_id: Option<String>,
    /// Present for `Done` records.
    pub record: Option<NormalizedRecord>,
    pub violations: Vec<Violation>,
    /// Present for `Failed` records.
    pub fault: Option<StructuralFault>,
}

impl RecordOutcome {
    pub fn failed(row: usize, product_id: Option<String>, fault: StructuralFault) -> Self {
        Self {
            row,
            state: RecordState::Failed,
            product_id,
            record: None,
            violations: Vec::new(),
            fault: Some(fault),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.state == RecordState::Failed
    }

    pub fn error_count(&self) -> usize {
        self.count_severity(Severity::Error)
    }

    pub fn advisory_count(&self) -> usize {
        self.count_severity(Severity::Advisory)
    }

    /// A completed record with no rejecting violation under `mode`.
    pub fn is_accepted(&self, mode: ValidationMode) -> bool {
        if self.state != RecordState::Done {
            return false;
        }
        match mode {
            ValidationMode::Strict => self.violations.is_empty(),
            ValidationMode::Lenient => self.error_count() == 0,
        }
    }

    fn count_severity(&self, severity: Severity) -> usize {
        self.violations
            .iter()
            .filter(|violation| violation.severity == severity)
            .count()
    }
}
