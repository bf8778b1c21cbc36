//! Headline metrics for the filtered view.

use crate::models::{SalaryRecord, SummaryMetrics};
use std::collections::HashMap;

impl SummaryMetrics {
    /// Compute the metrics from a filtered view.
    pub fn from_records(rows: &[&SalaryRecord]) -> Self {
        let record_count = rows.len();
        if record_count == 0 {
            return Self::default();
        }

        let n = record_count as f64;
        let salary_sum: f64 = rows.iter().map(|r| r.salary_in_usd).sum();
        let remote_sum: f64 = rows.iter().map(|r| f64::from(r.remote_ratio)).sum();

        Self {
            record_count,
            average_salary_k: Some(round2(salary_sum / n / 1000.0)),
            average_remote_ratio: Some(round2(remote_sum / n)),
            top_employee_residence: most_common(rows.iter().map(|r| r.employee_residence.as_str()))
                .map(str::to_string),
        }
    }
}

/// Most frequent value; ties go to the value seen first.
pub fn most_common<'a>(values: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();

    for (position, value) in values.enumerate() {
        counts.entry(value).or_insert((0, position)).0 += 1;
    }

    counts
        .into_iter()
        .max_by(|(_, (count_a, first_a)), (_, (count_b, first_b))| {
            count_a.cmp(count_b).then(first_b.cmp(first_a))
        })
        .map(|(value, _)| value)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
