//! CSV reading and record validation.

use crate::error::{DashboardError, Result};
use crate::models::SalaryRecord;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::debug;

/// Columns every dataset must provide. Extra columns are ignored.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "work_year",
    "experience_level",
    "employee_residence",
    "remote_ratio",
    "company_location",
    "company_size",
    "job_title",
    "salary_in_usd",
];

/// Options controlling how the dataset file is parsed.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Field delimiter (default: comma).
    pub delimiter: u8,
    /// Show a spinner while loading.
    pub show_progress: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            show_progress: false,
        }
    }
}

/// Read and validate all records of a dataset file.
pub fn load_records(path: &Path, options: &LoadOptions) -> Result<Vec<SalaryRecord>> {
    let file = File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = read_records(BufReader::new(file), path, options)?;

    if records.is_empty() {
        return Err(DashboardError::EmptyDataset(path.to_path_buf()));
    }

    Ok(records)
}

/// Parse records from any reader. `path` is only used in error messages.
pub(crate) fn read_records<R: Read>(
    reader: R,
    path: &Path,
    options: &LoadOptions,
) -> Result<Vec<SalaryRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| DashboardError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    check_columns(&headers, path)?;
    debug!("Dataset header: {:?}", headers);

    let mut records = Vec::new();
    for row in rdr.records() {
        let row = row.map_err(|e| csv_error(e, path))?;
        records.push(parse_row(&row, &headers)?);
    }

    debug!("Parsed {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Fail with the full list of required columns absent from the header.
fn check_columns(headers: &StringRecord, path: &Path) -> Result<()> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DashboardError::MissingColumns {
            path: path.to_path_buf(),
            missing,
        })
    }
}

/// Deserialize one row and check the constraints serde cannot express.
fn parse_row(row: &StringRecord, headers: &StringRecord) -> Result<SalaryRecord> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);
    let malformed = |message: String| DashboardError::MalformedRecord { line, message };

    let record: SalaryRecord = row
        .deserialize(Some(headers))
        .map_err(|e| match e.kind() {
            csv::ErrorKind::Deserialize { err, .. } => malformed(err.to_string()),
            _ => malformed(e.to_string()),
        })?;

    if !record.salary_in_usd.is_finite() {
        return Err(malformed("salary_in_usd is not a number".to_string()));
    }
    if record.salary_in_usd < 0.0 {
        return Err(malformed(format!(
            "salary_in_usd is negative ({})",
            record.salary_in_usd
        )));
    }

    let text_fields = [
        ("job_title", &record.job_title),
        ("company_location", &record.company_location),
        ("employee_residence", &record.employee_residence),
    ];
    for (name, value) in text_fields {
        if value.is_empty() {
            return Err(malformed(format!("{} is empty", name)));
        }
    }

    Ok(record)
}

/// Map reader-level errors, keeping line numbers where the csv crate has them.
fn csv_error(err: csv::Error, path: &Path) -> DashboardError {
    let line = err.position().map(|p| p.line());
    match (err.kind(), line) {
        (csv::ErrorKind::UnequalLengths { expected_len, len, .. }, Some(line)) => {
            DashboardError::MalformedRecord {
                line,
                message: format!("expected {} fields, found {}", expected_len, len),
            }
        }
        _ => DashboardError::Csv {
            path: path.to_path_buf(),
            source: err,
        },
    }
}
