//! SalaryScope - data science salary dashboard reports
//!
//! A CLI tool that loads a salary survey CSV, filters it by company
//! location and work year, and renders headline metrics plus aggregate
//! tables as Markdown, JSON or plain text.
//!
//! Exit codes:
//!   0 - Success (including a filter selection that matches no records)
//!   1 - Runtime error (dataset, config, output, etc.)

mod analysis;
mod cli;
mod config;
mod country;
mod dataset;
mod error;
mod models;
mod report;

use analysis::RecordFilter;
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use country::IsoCountryTable;
use dataset::{Dataset, LoadOptions};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Where the effective configuration came from.
enum ConfigSource {
    Explicit,
    WorkingDir,
    Defaults,
    BrokenDefault(anyhow::Error),
}

fn main() {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        if let Err(e) = handle_init_config() {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
        return;
    }

    let (config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    init_logging(&args, &config);

    info!("SalaryScope v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    log_config_source(&args, source);

    if let Err(e) = run(args, config) {
        error!("Dashboard failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }
}

/// Handle --init-config: generate a default .salaryscope.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        anyhow::bail!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the dataset path, delimiter and report options.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so the report can be piped from stdout.
fn init_logging(args: &Args, config: &Config) {
    let level = if !args.quiet && config.general.verbose {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(level.as_str().to_lowercase()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the dashboard, aggregate the current selection and emit the report.
fn run(args: Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    let options = LoadOptions {
        delimiter: config.data.delimiter_byte()?,
        show_progress: !args.quiet,
    };

    let dataset = dataset::load_once(&config.data.path, &options)
        .with_context(|| format!("Failed to load dataset {}", config.data.path.display()))?;

    if args.list_filters {
        print_filter_options(dataset);
        return Ok(());
    }

    let filter = RecordFilter::for_dataset(dataset, args.country.clone(), args.years.as_deref());
    check_filter(dataset, &filter);

    let normalizer = IsoCountryTable::new();
    let analysis = analysis::analyze(dataset.records(), &filter, &normalizer);

    if analysis.rows.is_empty() {
        warn!(
            "No records match country={} years={:?}",
            filter.country_label(),
            filter.years
        );
    } else {
        info!(
            "{} of {} records selected; {} job titles, {} countries",
            analysis.rows.len(),
            dataset.len(),
            analysis.tables.top_job_titles.len(),
            analysis.tables.income_by_country.len()
        );
    }

    let duration = start_time.elapsed().as_secs_f64();
    let report = report::build_report(
        dataset,
        &filter,
        &analysis,
        config.detail_row_limit(),
        duration,
    );

    let render_options = report::RenderOptions {
        top_job_titles: config.report.top_job_titles,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report, &render_options),
        OutputFormat::Text => report::generate_text_report(&report, &render_options),
    };

    match config.output_path() {
        Some(path) => {
            std::fs::write(&path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;

            if !args.quiet {
                println!("📊 Dashboard Summary:");
                println!(
                    "   Records: {} of {}",
                    report.metadata.filtered_records, report.metadata.total_records
                );
                println!(
                    "   Average salary: {} k$",
                    report::format_metric(report.metrics.average_salary_k)
                );
                println!("\n✅ Report saved to: {}", path.display());
            }
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Print the selector choices the dataset offers.
fn print_filter_options(dataset: &Dataset) {
    println!("Countries: {}", dataset.country_options().join(", "));
    let years: Vec<String> = dataset
        .year_options()
        .iter()
        .map(|y| y.to_string())
        .collect();
    println!("Years: {}", years.join(", "));
}

/// Warn about filter values the dataset never contains.
fn check_filter(dataset: &Dataset, filter: &RecordFilter) {
    let known_years = dataset.year_options();
    for year in filter.years.iter().filter(|y| !known_years.contains(y)) {
        warn!("Work year {} does not occur in the dataset", year);
    }

    if let Some(ref country) = filter.country {
        if !dataset.country_options().iter().any(|c| c == country) {
            warn!("Company location {} does not occur in the dataset", country);
        }
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    let (mut config, source) = if let Some(ref config_path) = args.config {
        // An explicit path must load
        (Config::load(config_path)?, ConfigSource::Explicit)
    } else {
        match Config::load_default() {
            Ok(Some(config)) => (config, ConfigSource::WorkingDir),
            Ok(None) => (Config::default(), ConfigSource::Defaults),
            Err(e) => (Config::default(), ConfigSource::BrokenDefault(e)),
        }
    };

    config.merge_with_args(args);
    Ok((config, source))
}

fn log_config_source(args: &Args, source: ConfigSource) {
    match source {
        ConfigSource::Explicit => {
            if let Some(ref path) = args.config {
                info!("Loaded config from: {}", path.display());
            }
        }
        ConfigSource::WorkingDir => info!("Loaded default config from {}", CONFIG_FILE_NAME),
        ConfigSource::Defaults => debug!("No config file found, using defaults"),
        ConfigSource::BrokenDefault(e) => warn!("Failed to load config: {:#}", e),
    }
}
