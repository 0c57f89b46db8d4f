//! The finished dataset report.

use foodq_model::{
    FaultKind, RecordOutcome, Scope, ValidationMode, Violation, ViolationCode,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accumulator::{ReportAccumulator, ReportOptions};
use crate::profile::FieldProfile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub records: usize,
    /// Completed with no rejecting violation.
    pub accepted: usize,
    /// Completed with at least one rejecting violation.
    pub rejected: usize,
    /// Stopped by a structural fault.
    pub failed: usize,
    pub unique_product_ids: usize,
    pub missing_product_ids: usize,
    pub errors: usize,
    pub advisories: usize,
}

/// Records sharing a `product_id` that were not marked as intentional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateGroup {
    pub product_id: String,
    /// Input positions, ascending.
    pub positions: Vec<usize>,
    /// Row number of each member, parallel to `positions`.
    pub rows: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeCount {
    pub code: ViolationCode,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureCount {
    pub kind: FaultKind,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetReport {
    /// Fingerprint of the schema tables that produced the report.
    pub fingerprint: String,
    pub validation_mode: ValidationMode,
    pub totals: Totals,
    /// Ordered by `product_id`.
    pub duplicate_groups: Vec<DuplicateGroup>,
    /// Count descending, then code name ascending.
    pub histogram: Vec<CodeCount>,
    pub failures: Vec<FailureCount>,
    pub profile: Vec<FieldProfile>,
}

impl DatasetReport {
    /// True when every record was accepted.
    pub fn passed(&self) -> bool {
        self.totals.rejected == 0 && self.totals.failed == 0
    }

    pub fn count(&self, code: ViolationCode) -> usize {
        self.histogram
            .iter()
            .find(|entry| entry.code == code)
            .map_or(0, |entry| entry.count)
    }

    /// Duplicate group containing the outcome at input `position`, if any.
    pub fn duplicate_group_at(&self, position: usize) -> Option<&DuplicateGroup> {
        self.duplicate_groups
            .iter()
            .find(|group| group.positions.binary_search(&position).is_ok())
    }

    /// Append a `DUPLICATE_PRODUCT_ID` violation to every outcome in a
    /// duplicate group. `outcomes` must be the slice the report was built
    /// from.
    pub fn annotate(&self, outcomes: &mut [RecordOutcome]) {
        for (position, outcome) in outcomes.iter_mut().enumerate() {
            if outcome.is_failed() {
                continue;
            }
            let Some(group) = self.duplicate_group_at(position) else {
                continue;
            };
            let others: Vec<String> = group
                .positions
                .iter()
                .zip(&group.rows)
                .filter(|(other, _)| **other != position)
                .map(|(_, row)| row.to_string())
                .collect();
            outcome.violations.push(Violation::new(
                Scope::Field("product_id".to_string()),
                ViolationCode::DuplicateProductId,
                format!(
                    "product_id '{}' also appears in rows {}",
                    group.product_id,
                    others.join(", ")
                ),
            ));
        }
    }

    /// One-line summary, e.g. for logs.
    pub fn summary_line(&self) -> String {
        let totals = &self.totals;
        format!(
            "records={} accepted={} rejected={} failed={} duplicate_groups={} verdict={}",
            totals.records,
            totals.accepted,
            totals.rejected,
            totals.failed,
            self.duplicate_groups.len(),
            if self.passed() { "pass" } else { "fail" }
        )
    }
}

/// Aggregate `outcomes` in parallel.
pub fn build_report(outcomes: &[RecordOutcome], options: &ReportOptions) -> DatasetReport {
    let accumulator = outcomes
        .par_iter()
        .enumerate()
        .fold(ReportAccumulator::new, |mut acc, (position, outcome)| {
            acc.push(position, outcome, options);
            acc
        })
        .reduce(ReportAccumulator::new, ReportAccumulator::merge);
    debug!(records = accumulator.records(), "report accumulated");
    accumulator.finish(options)
}
