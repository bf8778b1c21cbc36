//! Record selection by company location and work year.

use crate::dataset::{Dataset, ALL_COUNTRIES};
use crate::models::SalaryRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The user's current selection.
///
/// `country: None` means every location; `years` is the set of work years
/// to keep (an empty set keeps nothing).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordFilter {
    pub country: Option<String>,
    pub years: BTreeSet<i32>,
}

impl RecordFilter {
    pub fn new(country: Option<String>, years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            country: country.and_then(normalize_country_choice),
            years: years.into_iter().collect(),
        }
    }

    /// Build a filter against a dataset, defaulting to every year in it.
    pub fn for_dataset(dataset: &Dataset, country: Option<String>, years: Option<&[i32]>) -> Self {
        match years {
            Some(years) => Self::new(country, years.iter().copied()),
            None => Self::new(country, dataset.year_options()),
        }
    }

    /// Whether a record passes both the country and the year condition.
    pub fn matches(&self, record: &SalaryRecord) -> bool {
        let country_ok = self
            .country
            .as_deref()
            .map_or(true, |country| record.company_location == country);

        country_ok && self.years.contains(&record.work_year)
    }

    /// Keep matching records, preserving input order.
    pub fn apply<'a>(&self, records: &'a [SalaryRecord]) -> Vec<&'a SalaryRecord> {
        records.iter().filter(|r| self.matches(r)).collect()
    }

    /// Display form of the country choice.
    pub fn country_label(&self) -> &str {
        self.country.as_deref().unwrap_or(ALL_COUNTRIES)
    }
}

/// Blank and "All" (any case) mean no country filter.
fn normalize_country_choice(country: String) -> Option<String> {
    let trimmed = country.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_COUNTRIES) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CompanySize, ExperienceLevel};

    fn record(year: i32, location: &str) -> SalaryRecord {
        SalaryRecord {
            work_year: year,
            experience_level: ExperienceLevel::Senior,
            employee_residence: location.to_string(),
            remote_ratio: 50,
            company_location: location.to_string(),
            company_size: CompanySize::Large,
            job_title: "Data Scientist".to_string(),
            salary_in_usd: 100000.0,
        }
    }

    #[test]
    fn test_all_means_no_country_filter() {
        assert_eq!(RecordFilter::new(Some("All".to_string()), [2020]).country, None);
        assert_eq!(RecordFilter::new(Some("all".to_string()), [2020]).country, None);
        assert_eq!(RecordFilter::new(Some("  ".to_string()), [2020]).country, None);
        assert_eq!(
            RecordFilter::new(Some(" US ".to_string()), [2020]).country,
            Some("US".to_string())
        );
    }

    #[test]
    fn test_matches_country_and_year() {
        let filter = RecordFilter::new(Some("US".to_string()), [2021, 2022]);
        assert!(filter.matches(&record(2021, "US")));
        assert!(!filter.matches(&record(2020, "US")));
        assert!(!filter.matches(&record(2021, "DE")));
    }

    #[test]
    fn test_apply_preserves_order() {
        let records = vec![record(2020, "US"), record(2021, "DE"), record(2022, "US")];
        let filter = RecordFilter::new(None, [2020, 2021, 2022]);
        let kept = filter.apply(&records);
        assert_eq!(kept.len(), 3);
        assert_eq!(kept[1].company_location, "DE");
    }

    #[test]
    fn test_empty_year_set_keeps_nothing() {
        let records = vec![record(2020, "US")];
        let filter = RecordFilter::new(None, Vec::<i32>::new());
        assert!(filter.apply(&records).is_empty());
    }

    #[test]
    fn test_for_dataset_defaults_to_all_years() {
        let dataset = Dataset::new("mem.csv", vec![record(2022, "US"), record(2020, "DE")]);
        let filter = RecordFilter::for_dataset(&dataset, None, None);
        assert_eq!(filter.years.into_iter().collect::<Vec<_>>(), vec![2020, 2022]);
        assert_eq!(
            RecordFilter::for_dataset(&dataset, None, Some(&[2021])).years.len(),
            1
        );
    }

    #[test]
    fn test_country_label() {
        assert_eq!(RecordFilter::new(None, [2020]).country_label(), "All");
        assert_eq!(
            RecordFilter::new(Some("GB".to_string()), [2020]).country_label(),
            "GB"
        );
    }
}
