//! Error types for schema loading and lookup.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading the field schema or its vocabularies.
///
/// A load failure is unrecoverable: no record can be interpreted without a
/// schema.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// Failed to read a caller-supplied table.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read or parse CSV content.
    #[error("Failed to read CSV {file}: {source}")]
    CsvRead {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// A cell could not be interpreted.
    #[error("Invalid {column} value '{value}' for {field} in {file}")]
    InvalidValue {
        file: String,
        field: String,
        column: &'static str,
        value: String,
    },

    /// A field row is internally inconsistent.
    #[error("Invalid field {field} in {file}: {message}")]
    InvalidField {
        file: String,
        field: String,
        message: String,
    },

    /// The same field name (case-insensitively) appears twice.
    #[error("Duplicate field {field} in {file}")]
    DuplicateField { file: String, field: String },

    /// A multi-value field names a vocabulary that was not loaded.
    #[error("Field {field} references unknown vocabulary '{vocabulary}'")]
    UnknownVocabulary { field: String, vocabulary: String },

    /// The table does not declare the record key.
    #[error("Schema does not declare the key field {field}")]
    MissingKeyField { field: &'static str },

    /// A vocabulary token pattern does not compile.
    #[error("Invalid pattern for vocabulary {name}: {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

/// Result type for schema loading operations.
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Lookup of a field name the schema does not declare.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("field '{field}' is not declared in the schema")]
pub struct SchemaLookupError {
    pub field: String,
}
