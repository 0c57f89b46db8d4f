use foodq_model::{Violation, ViolationCode};
use thiserror::Error;

/// A value that cannot be put into canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("'{value}' is not a number")]
    NotNumeric { value: String },
    #[error("'{value}' is not a finite number")]
    NonFinite { value: String },
}

impl NormalizeError {
    /// Field violation reported in place of the value.
    pub fn to_violation(&self, field: &str) -> Violation {
        Violation::field(field, ViolationCode::NotNumeric, self.to_string())
    }
}
