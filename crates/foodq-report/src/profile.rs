//! Numeric field profile.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Summary statistics of one numeric field over completed records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldProfile {
    pub field: String,
    /// Records carrying a value.
    pub count: usize,
    /// Records carrying the field without a value.
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
}

impl FieldProfile {
    /// Profile `values`, given in row order.
    pub fn from_values(field: &str, values: &[Option<f64>]) -> Self {
        let column = Float64Chunked::new(field.into(), values);
        let missing = column.null_count();
        Self {
            field: field.to_string(),
            count: column.len() - missing,
            missing,
            min: column.min(),
            max: column.max(),
            mean: column.mean(),
        }
    }
}
