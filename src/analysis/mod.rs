//! Analysis modules.
//!
//! Filtering, the four aggregate tables and the headline metrics, all
//! computed from one filtered view of the dataset.

pub mod aggregator;
pub mod filter;
pub mod metrics;

pub use aggregator::*;
pub use filter::RecordFilter;

use crate::country::CountryNormalizer;
use crate::models::{DerivedTables, SalaryRecord, SummaryMetrics};

/// Everything computed for one filter selection.
#[derive(Debug, Clone)]
pub struct Analysis<'a> {
    /// Records that passed the filter, in dataset order.
    pub rows: Vec<&'a SalaryRecord>,
    pub metrics: SummaryMetrics,
    pub tables: DerivedTables,
}

/// Filter the records once and derive metrics and tables from that view.
pub fn analyze<'a>(
    records: &'a [SalaryRecord],
    filter: &RecordFilter,
    normalizer: &dyn CountryNormalizer,
) -> Analysis<'a> {
    let rows = filter.apply(records);
    let metrics = SummaryMetrics::from_records(&rows);
    let tables = aggregate_filtered(&rows, normalizer);

    Analysis {
        rows,
        metrics,
        tables,
    }
}
