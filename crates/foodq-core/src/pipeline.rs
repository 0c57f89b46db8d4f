//! Dataset processing.
//!
//! Records are independent: each is processed on the rayon pool against the
//! engine's shared, immutable state, and outcomes come back in input order.

use std::time::Instant;

use foodq_model::{RawRecord, RecordOutcome};
use foodq_report::{DatasetReport, ReportOptions, build_report};
use rayon::prelude::*;
use tracing::{info, info_span};

use crate::engine::Engine;

/// Outcomes of a run (input order, duplicate violations attached) and the
/// dataset report.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub outcomes: Vec<RecordOutcome>,
    pub report: DatasetReport,
}

impl Engine {
    /// Process `records` in parallel; `on_record` is called once per record as
    /// it completes, from any worker thread.
    pub fn process_all<F>(&self, records: &[RawRecord], on_record: F) -> Vec<RecordOutcome>
    where
        F: Fn(&RecordOutcome) + Sync,
    {
        let ctx = self.context();
        records
            .par_iter()
            .map(|raw| {
                let outcome = crate::processor::process_record(raw, &ctx);
                on_record(&outcome);
                outcome
            })
            .collect()
    }

    /// Report options derived from the engine's configuration and schema.
    pub fn report_options(&self) -> ReportOptions {
        ReportOptions {
            allow_duplicate_ids: self.config().allow_duplicate_ids,
            validation_mode: self.config().validation_mode,
            numeric_fields: self
                .schema()
                .fields()
                .iter()
                .filter(|field| field.kind.is_numeric())
                .map(|field| field.name.clone())
                .collect(),
            fingerprint: self.schema().fingerprint().to_string(),
        }
    }

    /// Process a dataset and build its report.
    pub fn check<F>(&self, records: &[RawRecord], on_record: F) -> CheckResult
    where
        F: Fn(&RecordOutcome) + Sync,
    {
        let span = info_span!("check", records = records.len());
        let _guard = span.enter();

        let start = Instant::now();
        let mut outcomes = self.process_all(records, on_record);
        info!(
            records = outcomes.len(),
            duration_ms = start.elapsed().as_millis(),
            "records processed"
        );

        let start = Instant::now();
        let report = build_report(&outcomes, &self.report_options());
        report.annotate(&mut outcomes);
        info!(
            accepted = report.totals.accepted,
            rejected = report.totals.rejected,
            failed = report.totals.failed,
            duplicate_groups = report.duplicate_groups.len(),
            duration_ms = start.elapsed().as_millis(),
            "report built"
        );

        CheckResult { outcomes, report }
    }
}
