//! CLI entry point for the data-sweep cleaning engine.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use data_sweep::{
    CleaningConfig, ColumnClassification, Dataset, DateNormalizer, IssueDetector, Service, io,
    remove_columns_frame,
};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    name = "data-sweep",
    version,
    about = "Tabular data cleaning engine",
    long_about = "Cleans tabular data: detects quality issues, normalizes dates, \
                  remaps categories, resolves missing values and normalizes casing.\n\n\
                  EXAMPLES:\n  \
                  # Run a JSON request from a file\n  \
                  data-sweep run --request request.json --pretty\n\n  \
                  # Run a JSON request from stdin\n  \
                  cat request.json | data-sweep run\n\n  \
                  # Drop duplicate rows and two columns from a CSV\n  \
                  data-sweep remove-columns -i data.csv -c notes,internal_id -o clean.csv\n\n  \
                  # Preview issues in a CSV\n  \
                  data-sweep issues -i data.csv --numeric age,income --date joined"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON file with date format lists
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute one JSON request and print the JSON response
    ///
    /// Logging is disabled so stdout carries only the response.
    Run {
        /// Request file; stdin when omitted
        #[arg(short, long)]
        request: Option<PathBuf>,
    },

    /// Drop duplicate rows, then drop the given columns from a CSV file
    RemoveColumns {
        /// Path to the CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Comma-separated column names
        #[arg(short, long, value_delimiter = ',', required = true)]
        columns: Vec<String>,

        /// Output CSV path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the issue report for a CSV file
    Issues {
        /// Path to the CSV file
        #[arg(short, long)]
        input: PathBuf,

        /// Columns to treat as numeric
        #[arg(long, value_delimiter = ',')]
        numeric: Vec<String>,

        /// Columns to treat as dates
        #[arg(long, value_delimiter = ',')]
        date: Vec<String>,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(
        &cli.log_level,
        cli.quiet,
        matches!(cli.command, Command::Run { .. }),
    );

    let config = load_config(cli.config.as_deref())?;

    match &cli.command {
        Command::Run { request } => run_request(&config, request.as_deref(), cli.pretty),
        Command::RemoveColumns {
            input,
            columns,
            output,
        } => run_remove_columns(input, columns, output.as_deref()),
        Command::Issues {
            input,
            numeric,
            date,
        } => run_issues(&config, input, numeric, date),
    }
}

fn load_config(path: Option<&Path>) -> Result<CleaningConfig> {
    let Some(path) = path else {
        return Ok(CleaningConfig::default());
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: CleaningConfig = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config.validate()?;

    debug!("Loaded config from {}: {:?}", path.display(), config);
    Ok(config)
}

/// Handle one request. Exits with status 1 when the response is an error.
fn run_request(config: &CleaningConfig, path: Option<&Path>, pretty: bool) -> Result<()> {
    let body = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {}", path.display()))?,
        None => {
            let mut body = String::new();
            std::io::stdin()
                .read_to_string(&mut body)
                .context("Failed to read request from stdin")?;
            body
        }
    };

    let service = Service::new(config)?;
    let response = service.handle_json(&body);

    let json = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{json}");

    if !response.is_success() {
        std::process::exit(1);
    }
    Ok(())
}

fn run_remove_columns(input: &Path, columns: &[String], output: Option<&Path>) -> Result<()> {
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", input.display()));
    }

    let df = io::read_csv_frame(input)?;
    info!(
        "Dataset loaded successfully: {} rows x {} columns",
        df.height(),
        df.width()
    );

    let mut cleaned = remove_columns_frame(&df, columns)?;

    match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            io::write_csv_frame(&mut cleaned, BufWriter::new(file))?;
            info!("Cleaned dataset saved to: {}", path.display());
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            io::write_csv_frame(&mut cleaned, &mut handle)?;
            handle.flush()?;
        }
    }
    Ok(())
}

/// Print a per-column issue table.
///
/// Uses `println!` for the table itself; it is the command's output, not a log.
fn run_issues(
    config: &CleaningConfig,
    input: &Path,
    numeric: &[String],
    date: &[String],
) -> Result<()> {
    if !input.exists() {
        return Err(anyhow!("Input file not found: {}", input.display()));
    }

    let dataset = io::read_csv(input)?;
    let classifications = classify(&dataset, numeric, date)?;

    let detector = IssueDetector::new(DateNormalizer::new(config)?);
    let counts = detector.count_issues(&dataset, &classifications)?;

    println!("\n{}", "=".repeat(72));
    println!("ISSUES - {}", input.display());
    println!("{}\n", "=".repeat(72));
    println!("  Rows: {}", dataset.height());
    println!("  Columns: {}", dataset.width());
    println!();

    println!(
        "{:<24} {:<10} {:<12} {:<14} {}",
        "Column", "Missing", "Non-numeric", "Invalid dates", "Issues"
    );
    println!("{}", "-".repeat(72));

    let dash = || "-".to_string();
    for (name, column) in &counts {
        let labels: Vec<&str> = column.issues().iter().map(|i| i.label()).collect();
        println!(
            "{:<24} {:<10} {:<12} {:<14} {}",
            truncate_str(name, 23),
            column.missing,
            column.non_numeric.map_or_else(dash, |n| n.to_string()),
            column.invalid_dates.map_or_else(dash, |n| n.to_string()),
            labels.join(", ")
        );
    }
    println!();
    Ok(())
}

/// Build classifications from the `--numeric` / `--date` lists; every other
/// column is text.
fn classify(
    dataset: &Dataset,
    numeric: &[String],
    date: &[String],
) -> Result<Vec<ColumnClassification>> {
    for name in numeric.iter().chain(date) {
        dataset.require_column(name)?;
    }

    let listed =
        |list: &[String], column: &str| list.iter().any(|n| n.eq_ignore_ascii_case(column));
    Ok(dataset
        .header()
        .iter()
        .map(|column| {
            if listed(numeric, column) {
                ColumnClassification::numeric()
            } else if listed(date, column) {
                ColumnClassification::date()
            } else {
                ColumnClassification::text()
            }
        })
        .collect())
}

/// Truncate a string to a maximum number of characters.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
