//! Shared data model for the food-product quality engine.
//!
//! - [`record`]: raw and normalized product rows
//! - [`violation`]: violation codes, severities and scopes
//! - [`outcome`]: per-record processing state and result
//! - [`options`]: engine configuration
//! - [`lookup`]: case-insensitive name lookup

pub mod error;
pub mod lookup;
pub mod options;
pub mod outcome;
pub mod record;
pub mod violation;

pub use error::ConfigError;
pub use lookup::CaseInsensitiveLookup;
pub use options::{
    DEFAULT_ALLERGENS, EngineConfig, MatchingMode, UnknownFieldPolicy, UnknownSentinel,
    ValidationMode,
};
pub use outcome::{FaultKind, RecordOutcome, RecordState, StructuralFault};
pub use record::{FieldValue, ListSeparator, NormalizedRecord, RawRecord, format_number};
pub use violation::{Scope, Severity, Violation, ViolationCode};
