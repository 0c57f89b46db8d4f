//! CSV input and output for product datasets.
//!
//! The reader turns a headed CSV into [`RawRecord`]s without interpreting
//! any value; rows with the wrong number of fields are kept and marked
//! malformed so the engine can fail them individually.
//!
//! [`RawRecord`]: foodq_model::RawRecord

pub mod error;
pub mod reader;
pub mod writer;

pub use error::{IngestError, Result};
pub use reader::{CsvDataset, read_records, read_records_from_reader};
pub use writer::{VIOLATION_HEADERS, write_normalized, write_violations};
