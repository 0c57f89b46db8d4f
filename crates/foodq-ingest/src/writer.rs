use std::path::Path;

use csv::Writer;
use foodq_model::{RecordOutcome, Scope};
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Columns of the violation listing.
pub const VIOLATION_HEADERS: [&str; 6] =
    ["row", "product_id", "scope", "code", "severity", "message"];

fn create_writer(path: &Path) -> Result<Writer<std::fs::File>> {
    Writer::from_path(path).map_err(|source| IngestError::CsvWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Write the normalized rows of completed records, one column per header.
/// Failed records are skipped. Returns the number of rows written.
pub fn write_normalized(path: &Path, headers: &[String], outcomes: &[RecordOutcome]) -> Result<usize> {
    let mut writer = create_writer(path)?;
    let write_error = |source: csv::Error| IngestError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    writer.write_record(headers).map_err(write_error)?;
    let mut written = 0;
    for outcome in outcomes {
        let Some(record) = &outcome.record else {
            warn!(row = outcome.row, "failed record left out of normalized output");
            continue;
        };
        let row: Vec<String> = headers
            .iter()
            .map(|header| record.get(header).map(|value| value.render()).unwrap_or_default())
            .collect();
        writer.write_record(&row).map_err(write_error)?;
        written += 1;
    }
    writer.flush().map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), rows = written, "normalized rows written");
    Ok(written)
}

/// Write one line per violation and per structural fault. Returns the
/// number of lines written.
pub fn write_violations(path: &Path, outcomes: &[RecordOutcome]) -> Result<usize> {
    let mut writer = create_writer(path)?;
    let write_error = |source: csv::Error| IngestError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };

    writer.write_record(VIOLATION_HEADERS).map_err(write_error)?;
    let mut written = 0;
    for outcome in outcomes {
        let row = outcome.row.to_string();
        let product_id = outcome.product_id.as_deref().unwrap_or("");
        if let Some(fault) = &outcome.fault {
            let scope = Scope::Record.to_string();
            writer
                .write_record([
                    row.as_str(),
                    product_id,
                    scope.as_str(),
                    fault.kind.code(),
                    "fatal",
                    fault.message.as_str(),
                ])
                .map_err(write_error)?;
            written += 1;
        }
        for violation in &outcome.violations {
            let scope = violation.scope.to_string();
            writer
                .write_record([
                    row.as_str(),
                    product_id,
                    scope.as_str(),
                    violation.code.as_str(),
                    violation.severity.as_str(),
                    violation.message.as_str(),
                ])
                .map_err(write_error)?;
            written += 1;
        }
    }
    writer.flush().map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), lines = written, "violations written");
    Ok(written)
}
