use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ByteRecord, ReaderBuilder, StringRecord};
use foodq_model::RawRecord;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Header and records of a decoded CSV file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CsvDataset {
    pub headers: Vec<String>,
    pub records: Vec<RawRecord>,
}

impl CsvDataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows the reader marked malformed.
    pub fn malformed_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.malformed.is_some())
            .count()
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').trim().to_string()
}

fn to_record(row: usize, headers: &[String], values: &StringRecord) -> RawRecord {
    let mut record = RawRecord::from_pairs(
        row,
        headers
            .iter()
            .zip(values.iter())
            .map(|(name, value)| (name.as_str(), value)),
    );
    if values.len() != headers.len() {
        record = record.with_malformed(format!(
            "expected {} fields, found {}",
            headers.len(),
            values.len()
        ));
    }
    record
}

/// Decode a headed CSV from any reader. `source` names the input in errors.
pub fn read_records_from_reader<R: Read>(reader: R, source: &Path) -> Result<CsvDataset> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let csv_error = |source_err: csv::Error| IngestError::CsvRead {
        path: source.to_path_buf(),
        source: source_err,
    };

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| normalize_header(&String::from_utf8_lossy(header)))
        .collect();
    if headers.iter().all(String::is_empty) {
        return Err(IngestError::EmptyCsv {
            path: source.to_path_buf(),
        });
    }

    let mut records = Vec::new();
    let mut byte_record = ByteRecord::new();
    let mut row = 0usize;
    while reader.read_byte_record(&mut byte_record).map_err(csv_error)? {
        row += 1;
        match StringRecord::from_byte_record(byte_record.clone()) {
            Ok(values) => records.push(to_record(row, &headers, &values)),
            Err(err) => {
                warn!(row, error = %err, "row is not valid UTF-8");
                records.push(RawRecord::new(row).with_malformed("row is not valid UTF-8"));
            }
        }
    }

    debug!(
        source = %source.display(),
        columns = headers.len(),
        rows = records.len(),
        "csv decoded"
    );
    Ok(CsvDataset { headers, records })
}

/// Decode a headed CSV file.
pub fn read_records(path: &Path) -> Result<CsvDataset> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: PathBuf::from(path),
        });
    }
    let file = std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_records_from_reader(file, path)
}
