//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// SalaryScope - salary survey dashboards from a CSV dataset
///
/// Loads a data-science salary survey, filters it by company location and
/// work year, and renders headline metrics plus four aggregate tables as a
/// Markdown, JSON or plain-text report.
///
/// Examples:
///   salaryscope
///   salaryscope --country US --years 2021,2022
///   salaryscope --data surveys/ds_salaries.csv --format json --output dashboard.json
///   salaryscope --list-filters
///   salaryscope --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the salary CSV file
    ///
    /// Defaults to data/data.csv, or the [data] path of the config file.
    #[arg(short, long, value_name = "FILE", env = "SALARYSCOPE_DATA")]
    pub data: Option<PathBuf>,

    /// Only keep records whose company is located in this country
    ///
    /// Use the code as it appears in the dataset (e.g. US, GB). "All" disables
    /// the filter.
    #[arg(long, value_name = "CODE")]
    pub country: Option<String>,

    /// Work years to keep (comma-separated)
    ///
    /// Example: --years 2021,2022. Defaults to every year in the dataset.
    #[arg(long, value_name = "YEARS", value_delimiter = ',')]
    pub years: Option<Vec<i32>>,

    /// Output file path for the report (stdout when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (markdown, json, text)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Number of job titles shown in the top-paid table
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Maximum records in the detailed data view (0 disables it)
    #[arg(long, value_name = "ROWS")]
    pub max_detail_rows: Option<usize>,

    /// Field delimiter of the CSV file
    #[arg(long, value_name = "CHAR")]
    pub delimiter: Option<char>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salaryscope.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Print the available country and year filter values and exit
    #[arg(long)]
    pub list_filters: bool,

    /// Generate a default .salaryscope.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
    /// Plain text for the terminal
    Text,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        if let Some(ref country) = self.country {
            if country.trim().is_empty() {
                return Err("--country must not be empty (use \"All\" for no filter)".to_string());
            }
        }

        if let Some(ref years) = self.years {
            if let Some(year) = years.iter().find(|y| !(1900..=2100).contains(*y)) {
                return Err(format!("Work year out of range: {}", year));
            }
        }

        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err("Delimiter must be a single ASCII character".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
