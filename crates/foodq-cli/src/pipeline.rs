//! The `check` run: read, process, report, write.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use foodq_core::Engine;
use foodq_ingest::{read_records, write_normalized, write_violations};
use foodq_model::{EngineConfig, RecordOutcome};
use foodq_report::DatasetReport;
use foodq_standards::{SchemaRegistry, StandardsConfig};
use indicatif::ProgressBar;
use tracing::{info, info_span, trace};

use crate::logging::redact_value;

/// Inputs of a `check` run.
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub input: PathBuf,
    /// Field table replacing the embedded one.
    pub schema: Option<PathBuf>,
    /// Where to write the normalized dataset.
    pub output: Option<PathBuf>,
    /// Where to write the violation listing.
    pub violations: Option<PathBuf>,
    pub config: EngineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct CheckRun {
    pub input: PathBuf,
    pub report: DatasetReport,
    pub outcomes: Vec<RecordOutcome>,
    pub normalized: Option<WrittenFile>,
    pub violations: Option<WrittenFile>,
}

pub fn standards_config(schema: Option<&Path>) -> StandardsConfig {
    match schema {
        Some(path) => StandardsConfig::default().with_fields_path(path),
        None => StandardsConfig::default(),
    }
}

/// Columns of the normalized output: source headers under their canonical
/// names, followed by derived fields the source does not carry.
pub fn output_headers(schema: &SchemaRegistry, config: &EngineConfig, headers: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = headers
        .iter()
        .map(|header| {
            schema
                .canonical_name(header)
                .map_or_else(|| header.clone(), str::to_string)
        })
        .collect();
    if config.derive_log_fields {
        for field in schema.fields().iter().filter(|field| field.is_derived()) {
            if !columns.iter().any(|column| column == &field.name) {
                columns.push(field.name.clone());
            }
        }
    }
    columns
}

/// Run a full check of `request.input`. `progress` advances once per record.
pub fn run_check(request: &CheckRequest, progress: &ProgressBar) -> Result<CheckRun> {
    let span = info_span!("run", input = %request.input.display());
    let _guard = span.enter();

    let engine = Engine::new(
        request.config.clone(),
        standards_config(request.schema.as_deref()),
    )
    .context("initialize engine")?;

    let start = Instant::now();
    let dataset = read_records(&request.input)
        .with_context(|| format!("read {}", request.input.display()))?;
    info!(
        records = dataset.len(),
        malformed = dataset.malformed_count(),
        duration_ms = start.elapsed().as_millis(),
        "input read"
    );

    progress.set_length(dataset.len() as u64);
    let result = engine.check(&dataset.records, |_| progress.inc(1));
    progress.finish_and_clear();

    for outcome in result.outcomes.iter().filter(|outcome| outcome.is_failed()) {
        trace!(
            row = outcome.row,
            product_id = redact_value(outcome.product_id.as_deref().unwrap_or("")),
            fault = ?outcome.fault,
            "record failed"
        );
    }

    let normalized = match &request.output {
        Some(path) => {
            let headers = output_headers(engine.schema(), engine.config(), &dataset.headers);
            let rows = write_normalized(path, &headers, &result.outcomes)
                .with_context(|| format!("write normalized dataset {}", path.display()))?;
            Some(WrittenFile {
                path: path.clone(),
                rows,
            })
        }
        None => None,
    };
    let violations = match &request.violations {
        Some(path) => {
            let rows = write_violations(path, &result.outcomes)
                .with_context(|| format!("write violations {}", path.display()))?;
            Some(WrittenFile {
                path: path.clone(),
                rows,
            })
        }
        None => None,
    };

    info!(summary = %result.report.summary_line(), "check finished");
    Ok(CheckRun {
        input: request.input.clone(),
        report: result.report,
        outcomes: result.outcomes,
        normalized,
        violations,
    })
}
