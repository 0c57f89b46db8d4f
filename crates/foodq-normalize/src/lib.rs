//! Value normalization for product records.
//!
//! Every function here maps a raw string to its canonical form for one field
//! domain without changing what the value says:
//!
//! - **text**: free text, cleaned text, categorical labels and codes
//! - **numeric**: unit stripping and float parsing, log derivation
//! - **matching**: vocabulary lookup (exact, compact key, Jaro-Winkler)
//! - **multi_value**: tokenization and canonical re-joining
//! - **record**: a whole record against the schema
//!
//! An empty input always normalizes to [`FieldValue::Missing`].
//!
//! [`FieldValue::Missing`]: foodq_model::FieldValue::Missing

pub mod error;
pub mod matching;
pub mod multi_value;
pub mod numeric;
pub mod record;
pub mod text;

pub use error::NormalizeError;
pub use matching::{compact_key, resolve_token};
pub use multi_value::{normalize_list, split_tokens};
pub use numeric::{derive_log, parse_numeric};
pub use record::{NormalizedOutput, Normalizer};
