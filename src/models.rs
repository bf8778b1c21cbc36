//! Data models for the salary dashboard.
//!
//! This module contains the survey record type, the coded columns with
//! their display labels, the derived tables produced by the aggregator,
//! and the report structure handed to the renderers.

use crate::analysis::RecordFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Label of the synthetic per-year row in the salary-by-year table.
pub const TOTAL_LABEL: &str = "Total";

/// Seniority tier of a role.
///
/// Codes outside the documented four are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum ExperienceLevel {
    Entry,
    Mid,
    Senior,
    Executive,
    Other(String),
}

impl ExperienceLevel {
    /// Returns the display label, or the raw code for unknown levels.
    pub fn label(&self) -> &str {
        match self {
            ExperienceLevel::Entry => "Entry-level / Junior",
            ExperienceLevel::Mid => "Mid-level / Intermediate",
            ExperienceLevel::Senior => "Senior-level / Expert",
            ExperienceLevel::Executive => "Executive-level / Director",
            ExperienceLevel::Other(code) => code,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Must never read like the per-year total row
            ExperienceLevel::Other(code) if code.eq_ignore_ascii_case(TOTAL_LABEL) => {
                write!(f, "Unknown ({})", code)
            }
            _ => f.write_str(self.label()),
        }
    }
}

impl From<&str> for ExperienceLevel {
    fn from(s: &str) -> Self {
        match s.trim() {
            "EN" => ExperienceLevel::Entry,
            "MI" => ExperienceLevel::Mid,
            "SE" => ExperienceLevel::Senior,
            "EX" => ExperienceLevel::Executive,
            other => ExperienceLevel::Other(other.to_string()),
        }
    }
}

impl From<String> for ExperienceLevel {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Serialize for ExperienceLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Employer size tier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "String")]
pub enum CompanySize {
    Small,
    Medium,
    Large,
    Other(String),
}

impl CompanySize {
    /// Returns the display label, or the raw code for unknown sizes.
    pub fn label(&self) -> &str {
        match self {
            CompanySize::Small => "Small",
            CompanySize::Medium => "Mid-size",
            CompanySize::Large => "Large",
            CompanySize::Other(code) => code,
        }
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<&str> for CompanySize {
    fn from(s: &str) -> Self {
        match s.trim() {
            "S" => CompanySize::Small,
            "M" => CompanySize::Medium,
            "L" => CompanySize::Large,
            other => CompanySize::Other(other.to_string()),
        }
    }
}

impl From<String> for CompanySize {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl Serialize for CompanySize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One row of the salary survey.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryRecord {
    /// Calendar year the salary pertains to.
    pub work_year: i32,
    /// Seniority tier.
    pub experience_level: ExperienceLevel,
    /// Country of residence of the employee (ISO2 code in the public dataset).
    pub employee_residence: String,
    /// Percentage of work done remotely.
    pub remote_ratio: u32,
    /// Country of the employer's main office.
    pub company_location: String,
    /// Employer size tier.
    pub company_size: CompanySize,
    /// Free-text role name.
    pub job_title: String,
    /// Gross yearly salary converted to USD.
    pub salary_in_usd: f64,
}

/// Grouping bucket of the salary-by-year table: a level or the per-year total.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LevelBucket {
    Level(ExperienceLevel),
    Total,
}

impl fmt::Display for LevelBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelBucket::Level(level) => write!(f, "{}", level),
            LevelBucket::Total => f.write_str(TOTAL_LABEL),
        }
    }
}

impl Serialize for LevelBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Mean salary of one job title.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobTitleSalary {
    pub job_title: String,
    pub mean_salary_usd: f64,
}

/// Mean salary for a year and experience level (or the year's total).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearLevelSalary {
    pub work_year: i32,
    pub experience_level: LevelBucket,
    pub mean_salary_usd: f64,
}

impl YearLevelSalary {
    /// Whether this is the synthetic per-year total row.
    pub fn is_total(&self) -> bool {
        self.experience_level == LevelBucket::Total
    }
}

/// Mean salary for a remote ratio and company size.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoteSizeSalary {
    pub remote_ratio: u32,
    pub company_size: CompanySize,
    pub mean_salary_usd: f64,
}

/// Total salary paid by companies located in one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryIncome {
    /// ISO3 code, or the unresolved sentinel.
    pub company_location: String,
    pub total_salary_usd: f64,
}

/// The four tables derived from a filtered record set.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DerivedTables {
    pub top_job_titles: Vec<JobTitleSalary>,
    pub salary_by_year_level: Vec<YearLevelSalary>,
    pub remote_by_size: Vec<RemoteSizeSalary>,
    pub income_by_country: Vec<CountryIncome>,
}

impl DerivedTables {
    /// True when the filtered input was empty.
    pub fn is_empty(&self) -> bool {
        self.top_job_titles.is_empty()
            && self.salary_by_year_level.is_empty()
            && self.remote_by_size.is_empty()
            && self.income_by_country.is_empty()
    }
}

/// Headline figures shown above the tables.
///
/// Everything but `record_count` is `None` when no record matched.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub record_count: usize,
    /// Mean salary in thousands of USD, two decimals.
    pub average_salary_k: Option<f64>,
    /// Mean remote ratio in percent, two decimals.
    pub average_remote_ratio: Option<f64>,
    /// Most common employee residence.
    pub top_employee_residence: Option<String>,
}

/// Metadata about a generated dashboard report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Path of the dataset file.
    pub dataset_path: String,
    /// Date and time the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Records in the dataset.
    pub total_records: usize,
    /// Records left after filtering.
    pub filtered_records: usize,
    /// Time spent loading, aggregating and rendering, in seconds.
    pub duration_seconds: f64,
}

/// The complete dashboard report.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    /// Filters the report was computed with.
    pub filters: RecordFilter,
    pub metrics: SummaryMetrics,
    pub tables: DerivedTables,
    /// Filtered records for the detail view, possibly truncated.
    pub details: Vec<SalaryRecord>,
}
