//! Dataset-level aggregation of record outcomes.
//!
//! Outcomes are folded into [`ReportAccumulator`]s, which merge
//! associatively and commutatively, then finished into a [`DatasetReport`]:
//! totals, duplicate `product_id` groups, the violation histogram, failure
//! counts and a numeric profile of the normalized fields.

pub mod accumulator;
pub mod profile;
pub mod report;

pub use accumulator::{ReportAccumulator, ReportOptions};
pub use profile::FieldProfile;
pub use report::{CodeCount, DatasetReport, DuplicateGroup, FailureCount, Totals, build_report};
