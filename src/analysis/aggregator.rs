//! Salary aggregation.
//!
//! Turns a filtered record set into the four dashboard tables. Groups are
//! formed in order of first appearance and sorted with a stable sort, so
//! equal aggregates keep that order.

use super::RecordFilter;
use crate::country::CountryNormalizer;
use crate::models::{
    CountryIncome, DerivedTables, JobTitleSalary, LevelBucket, RemoteSizeSalary, SalaryRecord,
    YearLevelSalary,
};
use std::collections::HashMap;
use std::hash::Hash;

/// Running sum and count of a group.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    pub sum: f64,
    pub count: u64,
}

impl Accumulator {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    /// Arithmetic mean; `None` for an empty group.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

/// Filter `records` and compute all four tables.
#[allow(dead_code)] // The CLI goes through analyze(), which also needs the filtered rows
pub fn aggregate(
    records: &[SalaryRecord],
    filter: &RecordFilter,
    normalizer: &dyn CountryNormalizer,
) -> DerivedTables {
    aggregate_filtered(&filter.apply(records), normalizer)
}

/// Compute all four tables over an already-filtered view.
///
/// An empty view yields empty tables.
pub fn aggregate_filtered(
    rows: &[&SalaryRecord],
    normalizer: &dyn CountryNormalizer,
) -> DerivedTables {
    if rows.is_empty() {
        return DerivedTables::default();
    }

    DerivedTables {
        top_job_titles: top_job_titles(rows),
        salary_by_year_level: salary_by_year_level(rows),
        remote_by_size: remote_by_size(rows),
        income_by_country: income_by_country(rows, normalizer),
    }
}

/// Mean salary per job title, highest first.
pub fn top_job_titles(rows: &[&SalaryRecord]) -> Vec<JobTitleSalary> {
    let mut table: Vec<JobTitleSalary> = group_in_order(rows, |r| r.job_title.clone())
        .into_iter()
        .filter_map(|(job_title, acc)| {
            acc.mean().map(|mean_salary_usd| JobTitleSalary {
                job_title,
                mean_salary_usd,
            })
        })
        .collect();

    sort_descending(&mut table, |row| row.mean_salary_usd);
    table
}

/// Mean salary per (year, level), highest first, followed by one "Total"
/// row per year, also highest first.
///
/// A Total row is the mean over every record of that year, not the mean of
/// the level means.
pub fn salary_by_year_level(rows: &[&SalaryRecord]) -> Vec<YearLevelSalary> {
    let mut levels: Vec<YearLevelSalary> =
        group_in_order(rows, |r| (r.work_year, r.experience_level.clone()))
            .into_iter()
            .filter_map(|((work_year, level), acc)| {
                acc.mean().map(|mean_salary_usd| YearLevelSalary {
                    work_year,
                    experience_level: LevelBucket::Level(level),
                    mean_salary_usd,
                })
            })
            .collect();
    sort_descending(&mut levels, |row| row.mean_salary_usd);

    let mut totals: Vec<YearLevelSalary> = group_in_order(rows, |r| r.work_year)
        .into_iter()
        .filter_map(|(work_year, acc)| {
            acc.mean().map(|mean_salary_usd| YearLevelSalary {
                work_year,
                experience_level: LevelBucket::Total,
                mean_salary_usd,
            })
        })
        .collect();
    sort_descending(&mut totals, |row| row.mean_salary_usd);

    levels.extend(totals);
    levels
}

/// Mean salary per (remote ratio, company size), highest first.
pub fn remote_by_size(rows: &[&SalaryRecord]) -> Vec<RemoteSizeSalary> {
    let mut table: Vec<RemoteSizeSalary> =
        group_in_order(rows, |r| (r.remote_ratio, r.company_size.clone()))
            .into_iter()
            .filter_map(|((remote_ratio, company_size), acc)| {
                acc.mean().map(|mean_salary_usd| RemoteSizeSalary {
                    remote_ratio,
                    company_size,
                    mean_salary_usd,
                })
            })
            .collect();

    sort_descending(&mut table, |row| row.mean_salary_usd);
    table
}

/// Total salary per company country (ISO3), highest first.
///
/// Locations the normalizer cannot resolve are pooled under the
/// unresolved sentinel so the table still sums to the input total.
pub fn income_by_country(
    rows: &[&SalaryRecord],
    normalizer: &dyn CountryNormalizer,
) -> Vec<CountryIncome> {
    let mut resolved: HashMap<&str, String> = HashMap::new();

    let mut table: Vec<CountryIncome> = group_in_order(rows, |r| {
        resolved
            .entry(r.company_location.as_str())
            .or_insert_with(|| normalizer.normalize(&r.company_location))
            .clone()
    })
    .into_iter()
    .map(|(company_location, acc)| CountryIncome {
        company_location,
        total_salary_usd: acc.sum,
    })
    .collect();

    sort_descending(&mut table, |row| row.total_salary_usd);
    table
}

/// Group salaries by key, keeping groups in order of first appearance.
fn group_in_order<'a, K, F>(rows: &[&'a SalaryRecord], mut key: F) -> Vec<(K, Accumulator)>
where
    K: Eq + Hash + Clone,
    F: FnMut(&'a SalaryRecord) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Accumulator)> = Vec::new();

    for &record in rows {
        let k = key(record);
        let slot = *index.entry(k.clone()).or_insert_with(|| {
            groups.push((k, Accumulator::default()));
            groups.len() - 1
        });
        groups[slot].1.add(record.salary_in_usd);
    }

    groups
}

/// Stable sort, largest value first.
fn sort_descending<T>(rows: &mut [T], value: impl Fn(&T) -> f64) {
    rows.sort_by(|a, b| value(b).total_cmp(&value(a)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::country::{IsoCountryTable, UNRESOLVED_COUNTRY};
    use crate::models::{CompanySize, ExperienceLevel};
    use std::collections::HashSet;

    fn create_record(year: i32, level: &str, title: &str, salary: f64) -> SalaryRecord {
        SalaryRecord {
            work_year: year,
            experience_level: ExperienceLevel::from(level),
            employee_residence: "US".to_string(),
            remote_ratio: 100,
            company_location: "US".to_string(),
            company_size: CompanySize::Medium,
            job_title: title.to_string(),
            salary_in_usd: salary,
        }
    }

    fn located(mut record: SalaryRecord, location: &str) -> SalaryRecord {
        record.company_location = location.to_string();
        record
    }

    fn sample() -> Vec<SalaryRecord> {
        vec![
            located(create_record(2020, "SE", "Data Scientist", 100000.0), "US"),
            located(create_record(2020, "EN", "Data Analyst", 50000.0), "DE"),
            located(create_record(2021, "MI", "Data Scientist", 80000.0), "US"),
            located(create_record(2021, "MI", "ML Engineer", 120000.0), "GB"),
            located(create_record(2022, "EX", "Head of Data", 250000.0), "US"),
            located(create_record(2022, "SE", "Data Analyst", 90000.0), "GB"),
        ]
    }

    fn all_years() -> RecordFilter {
        RecordFilter::new(None, [2020, 2021, 2022])
    }

    #[test]
    fn test_two_record_example() {
        let records = vec![
            create_record(2020, "SE", "Data Scientist", 100000.0),
            create_record(2020, "EN", "Data Analyst", 50000.0),
        ];
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());

        let rows: Vec<(i32, String, f64)> = tables
            .salary_by_year_level
            .iter()
            .map(|r| (r.work_year, r.experience_level.to_string(), r.mean_salary_usd))
            .collect();

        assert_eq!(
            rows,
            vec![
                (2020, "Senior-level / Expert".to_string(), 100000.0),
                (2020, "Entry-level / Junior".to_string(), 50000.0),
                (2020, "Total".to_string(), 75000.0),
            ]
        );
    }

    #[test]
    fn test_top_job_titles_sorted_descending() {
        let records = sample();
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());
        let titles: Vec<&str> = tables
            .top_job_titles
            .iter()
            .map(|r| r.job_title.as_str())
            .collect();

        // Head of Data 250k, ML Engineer 120k, Scientist 90k, Analyst 70k
        assert_eq!(
            titles,
            vec!["Head of Data", "ML Engineer", "Data Scientist", "Data Analyst"]
        );
        assert_eq!(tables.top_job_titles[2].mean_salary_usd, 90000.0);
        assert_eq!(tables.top_job_titles[3].mean_salary_usd, 70000.0);
    }

    #[test]
    fn test_ties_keep_first_appearance_order() {
        let records = vec![
            create_record(2020, "MI", "Zeta Analyst", 60000.0),
            create_record(2020, "MI", "Alpha Analyst", 60000.0),
            create_record(2020, "MI", "Mid Analyst", 60000.0),
        ];
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());
        let titles: Vec<&str> = tables
            .top_job_titles
            .iter()
            .map(|r| r.job_title.as_str())
            .collect();
        assert_eq!(titles, vec!["Zeta Analyst", "Alpha Analyst", "Mid Analyst"]);
    }

    #[test]
    fn test_remote_by_size_ties_keep_first_appearance_order() {
        let mut records = vec![
            create_record(2020, "MI", "A", 70000.0),
            create_record(2020, "MI", "B", 70000.0),
            create_record(2020, "MI", "C", 70000.0),
        ];
        records[0].remote_ratio = 50;
        records[0].company_size = CompanySize::Large;
        records[1].remote_ratio = 0;
        records[1].company_size = CompanySize::Small;
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());

        let keys: Vec<(u32, CompanySize)> = tables
            .remote_by_size
            .iter()
            .map(|r| (r.remote_ratio, r.company_size.clone()))
            .collect();
        assert_eq!(
            keys,
            vec![
                (50, CompanySize::Large),
                (0, CompanySize::Small),
                (100, CompanySize::Medium),
            ]
        );
    }

    #[test]
    fn test_income_by_country_ties_keep_first_appearance_order() {
        let records = vec![
            located(create_record(2020, "SE", "A", 40000.0), "GB"),
            located(create_record(2020, "SE", "B", 40000.0), "DE"),
            located(create_record(2020, "SE", "C", 40000.0), "US"),
        ];
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());

        let codes: Vec<&str> = tables
            .income_by_country
            .iter()
            .map(|r| r.company_location.as_str())
            .collect();
        assert_eq!(codes, vec!["GBR", "DEU", "USA"]);
    }

    #[test]
    fn test_one_total_row_per_year() {
        let records = sample();
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());

        let totals: Vec<&YearLevelSalary> = tables
            .salary_by_year_level
            .iter()
            .filter(|r| r.is_total())
            .collect();
        let years: HashSet<i32> = totals.iter().map(|r| r.work_year).collect();
        assert_eq!(totals.len(), 3);
        assert_eq!(years.len(), 3);

        // Totals come after every level row
        let first_total = tables
            .salary_by_year_level
            .iter()
            .position(|r| r.is_total())
            .unwrap();
        assert!(tables.salary_by_year_level[first_total..]
            .iter()
            .all(|r| r.is_total()));
    }

    #[test]
    fn test_total_is_mean_of_rows_not_mean_of_levels() {
        let records = vec![
            create_record(2021, "SE", "A", 100000.0),
            create_record(2021, "SE", "B", 100000.0),
            create_record(2021, "SE", "C", 100000.0),
            create_record(2021, "EN", "D", 20000.0),
        ];
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());
        let total = tables
            .salary_by_year_level
            .iter()
            .find(|r| r.is_total())
            .unwrap();

        // Row mean is 80k; mean of level means would be 60k
        assert_eq!(total.mean_salary_usd, 80000.0);
    }

    #[test]
    fn test_remote_by_size_groups() {
        let mut records = sample();
        records[0].company_size = CompanySize::Large;
        records[1].remote_ratio = 0;
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());

        assert_eq!(tables.remote_by_size.len(), 3);
        assert_eq!(tables.remote_by_size[0].remote_ratio, 100);
        assert_eq!(tables.remote_by_size[0].company_size, CompanySize::Medium);
        assert_eq!(tables.remote_by_size[0].mean_salary_usd, 135000.0);
        let last = tables.remote_by_size.last().unwrap();
        assert_eq!((last.remote_ratio, last.mean_salary_usd), (0, 50000.0));
    }

    #[test]
    fn test_income_by_country_sums_to_total() {
        let records = sample();
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());

        let table_total: f64 = tables
            .income_by_country
            .iter()
            .map(|r| r.total_salary_usd)
            .sum();
        let input_total: f64 = records.iter().map(|r| r.salary_in_usd).sum();
        assert_eq!(table_total, input_total);

        assert_eq!(tables.income_by_country[0].company_location, "USA");
        assert_eq!(tables.income_by_country[0].total_salary_usd, 430000.0);
        assert_eq!(tables.income_by_country[1].company_location, "GBR");
        assert_eq!(tables.income_by_country[2].company_location, "DEU");
    }

    #[test]
    fn test_unresolved_country_kept_under_sentinel() {
        let records = vec![
            located(create_record(2020, "SE", "A", 10.0), "Atlantis"),
            located(create_record(2020, "SE", "B", 5.0), "El Dorado"),
            located(create_record(2020, "SE", "C", 100.0), "US"),
        ];
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());

        assert_eq!(tables.income_by_country.len(), 2);
        assert_eq!(tables.income_by_country[1].company_location, UNRESOLVED_COUNTRY);
        assert_eq!(tables.income_by_country[1].total_salary_usd, 15.0);
    }

    #[test]
    fn test_unknown_level_passes_through() {
        let records = vec![
            create_record(2020, "XX", "A", 10000.0),
            create_record(2020, "SE", "B", 30000.0),
        ];
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());
        let labels: Vec<String> = tables
            .salary_by_year_level
            .iter()
            .map(|r| r.experience_level.to_string())
            .collect();
        assert_eq!(labels, vec!["Senior-level / Expert", "XX", "Total"]);
    }

    #[test]
    fn test_level_code_total_does_not_duplicate_total_row() {
        let records = vec![
            create_record(2020, "Total", "A", 10.0),
            create_record(2020, "SE", "B", 30.0),
        ];
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());
        let labels: Vec<String> = tables
            .salary_by_year_level
            .iter()
            .map(|r| r.experience_level.to_string())
            .collect();
        assert_eq!(
            labels,
            vec!["Senior-level / Expert", "Unknown (Total)", "Total"]
        );
        assert_eq!(
            tables
                .salary_by_year_level
                .iter()
                .filter(|r| r.is_total())
                .count(),
            1
        );

        let json = serde_json::to_string(&tables.salary_by_year_level).unwrap();
        assert_eq!(json.matches("\"experience_level\":\"Total\"").count(), 1);
        assert!(json.contains("\"experience_level\":\"Unknown (Total)\""));
    }

    #[test]
    fn test_tables_bounded_by_distinct_keys() {
        let records = sample();
        let tables = aggregate(&records, &all_years(), &IsoCountryTable::new());

        let titles: HashSet<&str> = records.iter().map(|r| r.job_title.as_str()).collect();
        let year_levels: HashSet<(i32, &ExperienceLevel)> = records
            .iter()
            .map(|r| (r.work_year, &r.experience_level))
            .collect();
        let years: HashSet<i32> = records.iter().map(|r| r.work_year).collect();
        let remote_sizes: HashSet<(u32, &CompanySize)> = records
            .iter()
            .map(|r| (r.remote_ratio, &r.company_size))
            .collect();
        let locations: HashSet<&str> =
            records.iter().map(|r| r.company_location.as_str()).collect();

        assert_eq!(tables.top_job_titles.len(), titles.len());
        assert_eq!(
            tables.salary_by_year_level.len(),
            year_levels.len() + years.len()
        );
        assert_eq!(tables.remote_by_size.len(), remote_sizes.len());
        assert_eq!(tables.income_by_country.len(), locations.len());
    }

    #[test]
    fn test_country_and_year_filter() {
        let records = sample();
        let filter = RecordFilter::new(Some("US".to_string()), [2020, 2021]);
        let tables = aggregate(&records, &filter, &IsoCountryTable::new());

        assert_eq!(tables.top_job_titles.len(), 1);
        assert_eq!(tables.top_job_titles[0].job_title, "Data Scientist");
        assert_eq!(tables.top_job_titles[0].mean_salary_usd, 90000.0);
        assert_eq!(tables.income_by_country.len(), 1);
    }

    #[test]
    fn test_empty_selection_yields_empty_tables() {
        let records = sample();
        let filter = RecordFilter::new(Some("FR".to_string()), [2020, 2021, 2022]);
        let tables = aggregate(&records, &filter, &IsoCountryTable::new());
        assert!(tables.is_empty());
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let records = sample();
        let table = IsoCountryTable::new();
        let first = aggregate(&records, &all_years(), &table);
        let second = aggregate(&records, &all_years(), &table);
        assert_eq!(first, second);
    }

    #[test]
    fn test_accumulator_mean() {
        let mut acc = Accumulator::default();
        assert_eq!(acc.mean(), None);
        acc.add(10.0);
        acc.add(20.0);
        assert_eq!(acc.mean(), Some(15.0));
        assert_eq!(acc.count, 2);
    }
}
