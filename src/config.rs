//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salaryscope.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".salaryscope.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Dataset settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path. Empty means stdout.
    #[serde(default)]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Dataset location and format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Path of the salary CSV file.
    #[serde(default = "default_data_path")]
    pub path: PathBuf,

    /// Field delimiter, a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            delimiter: default_delimiter(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data/data.csv")
}

fn default_delimiter() -> String {
    ",".to_string()
}

impl DataConfig {
    /// The delimiter as the byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8> {
        match self.delimiter.as_bytes() {
            [byte] if byte.is_ascii() => Ok(*byte),
            _ => anyhow::bail!(
                "Delimiter must be a single ASCII character, got {:?}",
                self.delimiter
            ),
        }
    }
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Job titles listed in the top-paid table of text reports.
    #[serde(default = "default_top_job_titles")]
    pub top_job_titles: usize,

    /// Include the detailed record view.
    #[serde(default = "default_true")]
    pub include_details: bool,

    /// Maximum records in the detailed view.
    #[serde(default = "default_max_detail_rows")]
    pub max_detail_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_job_titles: default_top_job_titles(),
            include_details: true,
            max_detail_rows: default_max_detail_rows(),
        }
    }
}

fn default_top_job_titles() -> usize {
    5
}

fn default_true() -> bool {
    true
}

fn default_max_detail_rows() -> usize {
    50
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load the config file from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were actually given.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.data.path = data.clone();
        }
        if let Some(delimiter) = args.delimiter {
            self.data.delimiter = delimiter.to_string();
        }

        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }

        if let Some(top) = args.top {
            self.report.top_job_titles = top;
        }
        if let Some(max_rows) = args.max_detail_rows {
            self.report.max_detail_rows = max_rows;
            self.report.include_details = max_rows > 0;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Output path, or `None` for stdout.
    pub fn output_path(&self) -> Option<PathBuf> {
        let output = self.general.output.trim();
        (!output.is_empty()).then(|| PathBuf::from(output))
    }

    /// Detail rows to render, zero when the section is disabled.
    pub fn detail_row_limit(&self) -> usize {
        if self.report.include_details {
            self.report.max_detail_rows
        } else {
            0
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.path, PathBuf::from("data/data.csv"));
        assert_eq!(config.data.delimiter_byte().unwrap(), b',');
        assert_eq!(config.report.top_job_titles, 5);
        assert_eq!(config.detail_row_limit(), 50);
        assert_eq!(config.output_path(), None);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "dashboard.md"
verbose = true

[data]
path = "surveys/ds_salaries.csv"
delimiter = ";"

[report]
top_job_titles = 10
include_details = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.output_path(), Some(PathBuf::from("dashboard.md")));
        assert!(config.general.verbose);
        assert_eq!(config.data.path, PathBuf::from("surveys/ds_salaries.csv"));
        assert_eq!(config.data.delimiter_byte().unwrap(), b';');
        assert_eq!(config.report.top_job_titles, 10);
        assert_eq!(config.report.max_detail_rows, 50);
        assert_eq!(config.detail_row_limit(), 0);
    }

    #[test]
    fn test_invalid_delimiter() {
        let mut config = Config::default();
        config.data.delimiter = "::".to_string();
        assert!(config.data.delimiter_byte().is_err());
        config.data.delimiter = String::new();
        assert!(config.data.delimiter_byte().is_err());
    }

    #[test]
    fn test_merge_with_args_only_overrides_given_flags() {
        let mut config = Config::default();
        config.report.top_job_titles = 8;
        config.data.path = PathBuf::from("from_config.csv");

        let args = Args::parse_from(["salaryscope", "--data", "cli.csv", "--max-detail-rows", "0"]);
        config.merge_with_args(&args);

        assert_eq!(config.data.path, PathBuf::from("cli.csv"));
        assert_eq!(config.report.top_job_titles, 8);
        assert_eq!(config.detail_row_limit(), 0);
    }

    #[test]
    fn test_load_from_dir() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[report]\ntop_job_titles = 3\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.report.top_job_titles, 3);

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[report\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[report]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.data.path, PathBuf::from("data/data.csv"));
    }
}
