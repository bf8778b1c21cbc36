//! Dashboard report assembly and rendering.

pub mod generator;
pub mod text;

pub use generator::{generate_json_report, generate_markdown_report, RenderOptions};
pub use text::generate_text_report;

use crate::analysis::{Analysis, RecordFilter};
use crate::dataset::Dataset;
use crate::models::{Report, ReportMetadata};
use chrono::Utc;

/// Placeholder shown instead of metrics and tables for an empty selection.
pub const EMPTY_SELECTION: &str = "No records match the selected filters.";

/// Bundle an analysis into a report.
///
/// `detail_rows` caps the detailed record view; zero leaves it empty.
pub fn build_report(
    dataset: &Dataset,
    filter: &RecordFilter,
    analysis: &Analysis<'_>,
    detail_rows: usize,
    duration_seconds: f64,
) -> Report {
    let metadata = ReportMetadata {
        dataset_path: dataset.path().display().to_string(),
        generated_at: Utc::now(),
        total_records: dataset.len(),
        filtered_records: analysis.rows.len(),
        duration_seconds,
    };

    Report {
        metadata,
        filters: filter.clone(),
        metrics: analysis.metrics.clone(),
        tables: analysis.tables.clone(),
        details: analysis
            .rows
            .iter()
            .take(detail_rows)
            .map(|r| (*r).clone())
            .collect(),
    }
}

/// One-line "About" footer shared by the renderers.
pub fn about_line() -> String {
    format!(
        "Report generated by SalaryScope v{}. Salaries are yearly gross amounts converted to USD.",
        env!("CARGO_PKG_VERSION")
    )
}

/// Note shown above a truncated detail view.
pub fn truncation_note(shown: usize, filtered: usize) -> Option<String> {
    (shown < filtered).then(|| format!("Showing the first {} of {} records.", shown, filtered))
}

/// Format a USD amount with thousands separators and no cents.
pub fn format_usd(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

/// Format an optional metric, "n/a" when absent.
pub fn format_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
}

/// Span of years in the filter, e.g. "2020-2022" or "2021".
pub fn year_span(filter: &RecordFilter) -> String {
    match (filter.years.first(), filter.years.last()) {
        (Some(first), Some(last)) if first != last => format!("{}-{}", first, last),
        (Some(first), _) => first.to_string(),
        _ => "no years".to_string(),
    }
}
