//! Markdown and JSON report generation.
//!
//! This module renders the dashboard report: headline metrics, the four
//! aggregate tables and the detailed record view.

use super::{
    about_line, format_metric, format_usd, truncation_note, year_span, EMPTY_SELECTION,
};
use crate::models::{
    CountryIncome, JobTitleSalary, RemoteSizeSalary, Report, ReportMetadata, SalaryRecord,
    SummaryMetrics, YearLevelSalary,
};
use crate::analysis::RecordFilter;
use anyhow::Result;

/// Options for the human-readable renderers.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Job titles shown in the top-paid table.
    pub top_job_titles: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { top_job_titles: 5 }
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &RenderOptions) -> String {
    let mut output = String::new();

    output.push_str("# Data Science Salary Dashboard\n\n");

    output.push_str(&generate_metadata_section(&report.metadata, &report.filters));
    output.push_str(&generate_metrics_section(&report.metrics));

    if report.tables.is_empty() {
        output.push_str(&format!("> {}\n\n", EMPTY_SELECTION));
    } else {
        output.push_str(&generate_top_titles_section(
            &report.tables.top_job_titles,
            options.top_job_titles,
        ));
        output.push_str(&generate_year_level_section(
            &report.tables.salary_by_year_level,
            &report.filters,
        ));
        output.push_str(&generate_remote_section(&report.tables.remote_by_size));
        output.push_str(&generate_country_section(&report.tables.income_by_country));
    }

    output.push_str(&generate_details_section(
        &report.details,
        report.metadata.filtered_records,
    ));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata, filters: &RecordFilter) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.dataset_path));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!(
        "- **Company Location:** {}\n",
        filters.country_label()
    ));
    section.push_str(&format!(
        "- **Work Years:** {}\n",
        join_years(filters)
    ));
    section.push_str(&format!(
        "- **Records:** {} of {}\n",
        metadata.filtered_records, metadata.total_records
    ));
    section.push('\n');

    section
}

/// Generate the headline metrics table.
fn generate_metrics_section(metrics: &SummaryMetrics) -> String {
    let mut section = String::new();

    section.push_str("## Key Metrics\n\n");
    section.push_str("| Average Salary (k$) | Average Work Done Remotely (%) | Most Employees From |\n");
    section.push_str("|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} |\n\n",
        format_metric(metrics.average_salary_k),
        format_metric(metrics.average_remote_ratio),
        metrics.top_employee_residence.as_deref().unwrap_or("n/a"),
    ));

    section
}

/// Generate the top-paid job titles table.
fn generate_top_titles_section(rows: &[JobTitleSalary], limit: usize) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Top {} Highest Income Job Titles\n\n",
        limit.min(rows.len())
    ));
    section.push_str("| # | Job Title | Mean Salary (USD) |\n");
    section.push_str("|:---:|:---|---:|\n");

    for (i, row) in rows.iter().take(limit).enumerate() {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            i + 1,
            escape_cell(&row.job_title),
            format_usd(row.mean_salary_usd)
        ));
    }
    section.push('\n');

    section
}

/// Generate the salary-by-level-and-year table.
fn generate_year_level_section(rows: &[YearLevelSalary], filters: &RecordFilter) -> String {
    let mut section = String::new();

    section.push_str(&format!(
        "## Salary by Level, {}\n\n",
        year_span(filters)
    ));
    section.push_str("| Year | Experience Level | Mean Salary (USD) |\n");
    section.push_str("|:---:|:---|---:|\n");

    for row in rows {
        let level = if row.is_total() {
            format!("**{}**", row.experience_level)
        } else {
            row.experience_level.to_string()
        };
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            row.work_year,
            level,
            format_usd(row.mean_salary_usd)
        ));
    }
    section.push('\n');

    section
}

/// Generate the remote-ratio by company-size table.
fn generate_remote_section(rows: &[RemoteSizeSalary]) -> String {
    let mut section = String::new();

    section.push_str("## Salary by Remote Ratio and Company Size\n\n");
    section.push_str("| Remote Ratio (%) | Company Size | Mean Salary (USD) |\n");
    section.push_str("|:---:|:---|---:|\n");

    for row in rows {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            row.remote_ratio,
            row.company_size,
            format_usd(row.mean_salary_usd)
        ));
    }
    section.push('\n');

    section
}

/// Generate the total-salary-by-country table.
fn generate_country_section(rows: &[CountryIncome]) -> String {
    let mut section = String::new();

    section.push_str("## Total Salary by Country\n\n");
    section.push_str("| Country (ISO3) | Total Salary (USD) |\n");
    section.push_str("|:---:|---:|\n");

    for row in rows {
        section.push_str(&format!(
            "| {} | {} |\n",
            row.company_location,
            format_usd(row.total_salary_usd)
        ));
    }
    section.push('\n');

    section
}

/// Generate the detailed record view.
fn generate_details_section(records: &[SalaryRecord], filtered: usize) -> String {
    if records.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Detailed Data View\n\n");
    if let Some(note) = truncation_note(records.len(), filtered) {
        section.push_str(&format!("*{}*\n\n", note));
    }

    section.push_str(
        "| Year | Level | Job Title | Salary (USD) | Residence | Remote (%) | Location | Size |\n",
    );
    section.push_str("|:---:|:---|:---|---:|:---:|:---:|:---:|:---|\n");

    for r in records {
        section.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} |\n",
            r.work_year,
            r.experience_level,
            escape_cell(&r.job_title),
            format_usd(r.salary_in_usd),
            escape_cell(&r.employee_residence),
            r.remote_ratio,
            escape_cell(&r.company_location),
            r.company_size
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!("*{}*\n", about_line()));

    footer
}

fn join_years(filters: &RecordFilter) -> String {
    if filters.years.is_empty() {
        return "none".to_string();
    }
    filters
        .years
        .iter()
        .map(|y| y.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Keep user text from breaking the table layout.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
