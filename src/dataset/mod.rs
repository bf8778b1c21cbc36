//! Salary dataset loading.
//!
//! The dataset is read once per process and kept as an immutable value;
//! every report is computed from that single load.

mod loader;

pub use loader::{load_records, LoadOptions};

use crate::error::Result;
use crate::models::SalaryRecord;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

/// Label of the "no country filter" choice.
pub const ALL_COUNTRIES: &str = "All";

static DATASET: OnceLock<Dataset> = OnceLock::new();

/// A loaded, validated salary dataset.
#[derive(Debug, Clone)]
pub struct Dataset {
    path: PathBuf,
    records: Vec<SalaryRecord>,
}

impl Dataset {
    /// Wrap already-parsed records.
    pub fn new(path: impl Into<PathBuf>, records: Vec<SalaryRecord>) -> Self {
        Self {
            path: path.into(),
            records,
        }
    }

    /// Read a dataset from disk.
    pub fn load(path: &Path, options: &LoadOptions) -> Result<Self> {
        let spinner = options.show_progress.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(format!("Loading {}", path.display()));
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let result = load_records(path, options);

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        let records = result?;
        info!("Loaded {} records from {}", records.len(), path.display());
        Ok(Self::new(path, records))
    }

    /// Path the dataset was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, in file order.
    pub fn records(&self) -> &[SalaryRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)] // Pairs with len()
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Country selector choices: "All" then each company location in
    /// order of first appearance.
    pub fn country_options(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut options = vec![ALL_COUNTRIES.to_string()];

        for record in &self.records {
            if seen.insert(record.company_location.as_str()) {
                options.push(record.company_location.clone());
            }
        }

        options
    }

    /// Distinct work years in order of first appearance.
    pub fn year_options(&self) -> Vec<i32> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|r| r.work_year)
            .filter(|year| seen.insert(*year))
            .collect()
    }
}

/// Load the dataset on first call and return the process-wide copy after.
///
/// Later calls never reload; a different `path` is ignored with a warning.
pub fn load_once(path: &Path, options: &LoadOptions) -> Result<&'static Dataset> {
    if let Some(dataset) = DATASET.get() {
        if dataset.path() != path {
            warn!(
                "Dataset already loaded from {}; ignoring {}",
                dataset.path().display(),
                path.display()
            );
        }
        return Ok(dataset);
    }

    let dataset = Dataset::load(path, options)?;
    Ok(DATASET.get_or_init(|| dataset))
}
