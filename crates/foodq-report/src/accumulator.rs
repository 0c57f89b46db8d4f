//! Mergeable per-dataset counters.

use std::collections::{BTreeMap, BTreeSet};

use foodq_model::{FaultKind, RecordOutcome, Severity, ValidationMode, ViolationCode};

use crate::profile::FieldProfile;
use crate::report::{CodeCount, DatasetReport, DuplicateGroup, FailureCount, Totals};

const INTENTIONAL_FLAG: &str = "intentional_duplicate";

/// Options that shape the report.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub allow_duplicate_ids: bool,
    pub validation_mode: ValidationMode,
    /// Fields included in the numeric profile, in report order.
    pub numeric_fields: Vec<String>,
    /// Schema fingerprint recorded in the report.
    pub fingerprint: String,
}

/// Members of one `product_id`, keyed by input position. Row numbers are
/// carried for display only; they need not be unique.
#[derive(Debug, Clone, Default, PartialEq)]
struct IdMembers {
    rows: BTreeMap<usize, usize>,
    intentional: BTreeSet<usize>,
    accepted: BTreeSet<usize>,
}

impl IdMembers {
    fn merge(&mut self, other: Self) {
        self.rows.extend(other.rows);
        self.intentional.extend(other.intentional);
        self.accepted.extend(other.accepted);
    }
}

/// Counters over a subset of the dataset.
///
/// `merge` is associative and commutative, so any split of the records
/// folded in any order finishes into the same report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportAccumulator {
    records: usize,
    accepted: usize,
    rejected: usize,
    failed: usize,
    missing_ids: usize,
    errors: usize,
    advisories: usize,
    codes: BTreeMap<ViolationCode, usize>,
    failures: BTreeMap<FaultKind, usize>,
    ids: BTreeMap<String, IdMembers>,
    /// Field -> position -> value, so the profile sees values in dataset
    /// order.
    numeric: BTreeMap<String, BTreeMap<usize, Option<f64>>>,
}

impl ReportAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> usize {
        self.records
    }

    /// Fold in the outcome at input `position`. Positions must be unique
    /// across every accumulator that is later merged.
    pub fn push(&mut self, position: usize, outcome: &RecordOutcome, options: &ReportOptions) {
        self.records += 1;

        if let Some(fault) = &outcome.fault {
            self.failed += 1;
            *self.failures.entry(fault.kind).or_default() += 1;
            return;
        }

        let accepted = outcome.is_accepted(options.validation_mode);
        if accepted {
            self.accepted += 1;
        } else {
            self.rejected += 1;
        }

        for violation in &outcome.violations {
            *self.codes.entry(violation.code).or_default() += 1;
            match violation.severity {
                Severity::Error => self.errors += 1,
                Severity::Advisory => self.advisories += 1,
            }
        }

        match &outcome.product_id {
            Some(id) => {
                let entry = self.ids.entry(id.clone()).or_default();
                entry.rows.insert(position, outcome.row);
                let intentional = outcome
                    .record
                    .as_ref()
                    .is_some_and(|record| record.text(INTENTIONAL_FLAG) == Some("1"));
                if intentional {
                    entry.intentional.insert(position);
                }
                if accepted {
                    entry.accepted.insert(position);
                }
            }
            None => self.missing_ids += 1,
        }

        if let Some(record) = &outcome.record {
            for field in &options.numeric_fields {
                if let Some(value) = record.get(field) {
                    self.numeric
                        .entry(field.clone())
                        .or_default()
                        .insert(position, value.as_number());
                }
            }
        }
    }

    /// Combine two accumulators.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.records += other.records;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.failed += other.failed;
        self.missing_ids += other.missing_ids;
        self.errors += other.errors;
        self.advisories += other.advisories;
        for (code, count) in other.codes {
            *self.codes.entry(code).or_default() += count;
        }
        for (kind, count) in other.failures {
            *self.failures.entry(kind).or_default() += count;
        }
        for (id, rows) in other.ids {
            self.ids.entry(id).or_default().merge(rows);
        }
        for (field, values) in other.numeric {
            self.numeric.entry(field).or_default().extend(values);
        }
        self
    }

    /// Resolve duplicate groups and produce the report.
    pub fn finish(self, options: &ReportOptions) -> DatasetReport {
        let mut codes = self.codes;
        let mut accepted = self.accepted;
        let mut rejected = self.rejected;
        let mut errors = self.errors;

        let mut duplicate_groups = Vec::new();
        for (product_id, members) in &self.ids {
            let size = members.rows.len();
            let intentional = options.allow_duplicate_ids || members.intentional.len() == size;
            if size < 2 || intentional {
                continue;
            }
            *codes.entry(ViolationCode::DuplicateProductId).or_default() += size;
            errors += size;
            accepted -= members.accepted.len();
            rejected += members.accepted.len();
            duplicate_groups.push(DuplicateGroup {
                product_id: product_id.clone(),
                positions: members.rows.keys().copied().collect(),
                rows: members.rows.values().copied().collect(),
            });
        }

        let mut histogram: Vec<CodeCount> = codes
            .into_iter()
            .map(|(code, count)| CodeCount { code, count })
            .collect();
        histogram.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.code.as_str().cmp(b.code.as_str()))
        });

        let failures = self
            .failures
            .into_iter()
            .map(|(kind, count)| FailureCount { kind, count })
            .collect();

        let profile = options
            .numeric_fields
            .iter()
            .filter_map(|field| {
                let values = self.numeric.get(field)?;
                let ordered: Vec<Option<f64>> = values.values().copied().collect();
                Some(FieldProfile::from_values(field, &ordered))
            })
            .collect();

        DatasetReport {
            fingerprint: options.fingerprint.clone(),
            validation_mode: options.validation_mode,
            totals: Totals {
                records: self.records,
                accepted,
                rejected,
                failed: self.failed,
                unique_product_ids: self.ids.len(),
                missing_product_ids: self.missing_ids,
                errors,
                advisories: self.advisories,
            },
            duplicate_groups,
            histogram,
            failures,
            profile,
        }
    }
}
