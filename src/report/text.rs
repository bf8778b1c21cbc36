//! Plain-text rendering for terminal output.

use super::{
    about_line, format_metric, format_usd, truncation_note, year_span, RenderOptions,
    EMPTY_SELECTION,
};
use crate::models::{Report, SalaryRecord};

const RULE_WIDTH: usize = 64;

/// Generate a terminal-friendly text report.
pub fn generate_text_report(report: &Report, options: &RenderOptions) -> String {
    let mut lines: Vec<String> = Vec::new();
    let metrics = &report.metrics;

    lines.push("Data Science Salary Dashboard".to_string());
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(format!("Dataset:          {}", report.metadata.dataset_path));
    lines.push(format!("Company location: {}", report.filters.country_label()));
    lines.push(format!("Work years:       {}", year_span(&report.filters)));
    lines.push(format!(
        "Records:          {} of {}",
        report.metadata.filtered_records, report.metadata.total_records
    ));
    lines.push(String::new());

    lines.push(format!(
        "Average salary (k$):            {}",
        format_metric(metrics.average_salary_k)
    ));
    lines.push(format!(
        "Average work done remotely (%): {}",
        format_metric(metrics.average_remote_ratio)
    ));
    lines.push(format!(
        "Most employees from:            {}",
        metrics.top_employee_residence.as_deref().unwrap_or("n/a")
    ));

    let tables = &report.tables;
    if tables.is_empty() {
        lines.push(String::new());
        lines.push(EMPTY_SELECTION.to_string());
        push_footer(&mut lines);
        return lines.join("\n") + "\n";
    }

    push_heading(
        &mut lines,
        &format!(
            "Top {} highest income job titles",
            options.top_job_titles.min(tables.top_job_titles.len())
        ),
    );
    for row in tables.top_job_titles.iter().take(options.top_job_titles) {
        lines.push(format!(
            "  {:<44} {:>14}",
            row.job_title,
            format_usd(row.mean_salary_usd)
        ));
    }

    push_heading(
        &mut lines,
        &format!("Salary by level, {}", year_span(&report.filters)),
    );
    for row in &tables.salary_by_year_level {
        lines.push(format!(
            "  {}  {:<38} {:>14}",
            row.work_year,
            row.experience_level.to_string(),
            format_usd(row.mean_salary_usd)
        ));
    }

    push_heading(&mut lines, "Salary by remote ratio and company size");
    for row in &tables.remote_by_size {
        lines.push(format!(
            "  {:>3}%  {:<38} {:>14}",
            row.remote_ratio,
            row.company_size.to_string(),
            format_usd(row.mean_salary_usd)
        ));
    }

    push_heading(&mut lines, "Total salary by country");
    for row in &tables.income_by_country {
        lines.push(format!(
            "  {:<44} {:>14}",
            row.company_location,
            format_usd(row.total_salary_usd)
        ));
    }

    push_details(&mut lines, &report.details, report.metadata.filtered_records);
    push_footer(&mut lines);

    lines.join("\n") + "\n"
}

fn push_heading(lines: &mut Vec<String>, title: &str) {
    lines.push(String::new());
    lines.push(title.to_string());
    lines.push("-".repeat(RULE_WIDTH));
}

/// Detailed record view; nothing when details are disabled.
fn push_details(lines: &mut Vec<String>, records: &[SalaryRecord], filtered: usize) {
    if records.is_empty() {
        return;
    }

    push_heading(lines, "Detailed data view");
    if let Some(note) = truncation_note(records.len(), filtered) {
        lines.push(note);
    }
    for r in records {
        lines.push(format!(
            "  {}  {:<26} {:<32} {:>12}  {:>3}%  {} -> {}  {}",
            r.work_year,
            r.experience_level.to_string(),
            r.job_title,
            format_usd(r.salary_in_usd),
            r.remote_ratio,
            r.employee_residence,
            r.company_location,
            r.company_size
        ));
    }
}

fn push_footer(lines: &mut Vec<String>) {
    lines.push(String::new());
    lines.push("=".repeat(RULE_WIDTH));
    lines.push(about_line());
}
