//! Validation of normalized product records.
//!
//! - [`checks`]: one field against its schema domain
//! - [`rules`]: record-level consistency rules spanning several fields
//!
//! Both layers only report. A violation never changes a value and never
//! stops the remaining checks.

pub mod checks;
pub mod rules;

pub use checks::{FieldContext, check_field};
pub use rules::{Category, Rule, RuleContext, RuleFn, RuleRegistry};
