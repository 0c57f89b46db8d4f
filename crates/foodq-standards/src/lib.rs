//! Field schema registry and token vocabularies.
//!
//! The registry describes every column a product dataset may carry: its
//! semantic kind, unit, nullability, allowed values, numeric range and, for
//! multi-value columns, the vocabulary its tokens come from. The bundled
//! tables are embedded at compile time; a caller may substitute its own field
//! table with the same header.
//!
//! # Module Organization
//!
//! - [`schema`]: field kinds and domain descriptors
//! - [`vocabulary`]: canonical token tables with synonyms
//! - [`registry`]: the loaded, immutable [`SchemaRegistry`]
//! - [`loader`]: CSV parsing of the field and vocabulary tables
//! - [`embedded`]: compiled-in table contents
//!
//! # Example
//!
//! ```rust,ignore
//! use foodq_standards::{SchemaRegistry, StandardsConfig};
//!
//! let registry = SchemaRegistry::load(&StandardsConfig::default())?;
//! let fat = registry.lookup("FAT_100G")?;
//! assert_eq!(fat.unit.as_deref(), Some("g"));
//! ```

pub mod embedded;
pub mod error;
pub mod hash;
pub mod loader;
pub mod registry;
pub mod schema;
pub mod vocabulary;

pub use error::{Result, SchemaError, SchemaLookupError};
pub use registry::{KEY_FIELD, SchemaRegistry, StandardsConfig};
pub use schema::{FieldDomain, FieldKind, NumericRange};
pub use vocabulary::{Vocabulary, VocabularyRegistry, term_key};
