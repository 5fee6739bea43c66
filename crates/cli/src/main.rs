// datalens CLI - profile a CSV/TSV/XLS(X) dataset from the shell

mod exit_codes;
mod report;
mod util;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use datalens_config::{Settings, SettingsError};
use datalens_engine::{
    basic_info, classify_with, column_stats, correlation_matrix, correlation_pairs_with, preview,
    profile_with, table_stats, Table,
};
use datalens_io::{load_with_report, LoadError, LoadReport};
use datalens_render::{
    bar_chart_with, heatmap_with, histogram_with, ChartArtifact, ChartOptions, RenderError, MAX_BINS,
};
use log::{debug, info};
use serde::Serialize;

use exit_codes::{EXIT_LOAD, EXIT_OUTPUT, EXIT_RENDER, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "datalens")]
#[command(about = "Profile tabular datasets: column types, statistics, correlations, charts")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Settings file (default: <config dir>/datalens/settings.json)
    #[arg(long, global = true, value_name = "PATH", env = "DATALENS_CONFIG")]
    config: Option<PathBuf>,

    /// Raise log level (-v info, -vv debug). DATALENS_LOG overrides.
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Shape, column names, memory footprint and how the file was decoded
    #[command(after_help = "\
Examples:
  datalens info sales.csv
  datalens info legacy.csv --json | jq .load.encoding")]
    Info {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// First and last rows
    Preview {
        file: PathBuf,

        /// Rows from the start
        #[arg(long, default_value_t = 5)]
        head: usize,

        /// Rows from the end
        #[arg(long, default_value_t = 5)]
        tail: usize,

        #[arg(long)]
        json: bool,
    },

    /// Semantic type and missing-value counts per column
    Types {
        file: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// Descriptive statistics for numeric columns
    #[command(after_help = "\
Examples:
  datalens stats sales.csv
  datalens stats sales.csv --column price --json")]
    Stats {
        file: PathBuf,

        /// Report a single column in detail (mode, IQR, range)
        #[arg(long, value_name = "NAME")]
        column: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Pearson correlation matrix, or the notable pairs with --pairs
    #[command(after_help = "\
Examples:
  datalens corr sales.csv
  datalens corr sales.csv --pairs --threshold 0.3")]
    Corr {
        file: PathBuf,

        /// List pairs with |r| at or above the threshold instead of the matrix
        #[arg(long)]
        pairs: bool,

        /// Pair threshold (default from settings, 0.5)
        #[arg(long, value_name = "T")]
        threshold: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Render an SVG chart
    #[command(subcommand)]
    Chart(ChartCommands),

    /// Full report (info, types, statistics, correlations) as JSON
    Profile { file: PathBuf },
}

#[derive(Subcommand)]
enum ChartCommands {
    /// Histogram with density curve for a numeric column
    #[command(after_help = "\
Examples:
  datalens chart histogram sales.csv price -o price.svg
  datalens chart histogram sales.csv price --bins 10")]
    Histogram {
        file: PathBuf,
        column: String,

        /// Bucket count, 1 to 1000 (default from settings, 30)
        #[arg(long)]
        bins: Option<usize>,

        /// Write the SVG here instead of printing a data URI
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Value counts for any column, long tail grouped as "Other"
    Bar {
        file: PathBuf,
        column: String,

        /// Bar limit including "Other" (default from settings, 20)
        #[arg(long)]
        max_categories: Option<usize>,

        /// Write the SVG here instead of printing a data URI
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Correlation heatmap over numeric columns
    Heatmap {
        file: PathBuf,

        /// Write the SVG here instead of printing a data URI
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

fn long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        " (",
        env!("GIT_COMMIT_HASH"),
        ")",
        "\nengine:  datalens-engine ",
        env!("CARGO_PKG_VERSION"),
        "\ntarget:  ",
        env!("TARGET"),
    )
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::new().filter_or("DATALENS_LOG", level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = load_settings(cli.config.as_deref()).and_then(|settings| run(cli.command, &settings));

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(command: Commands, settings: &Settings) -> Result<(), CliError> {
    match command {
        Commands::Info { file, json } => cmd_info(&file, json, settings),
        Commands::Preview { file, head, tail, json } => cmd_preview(&file, head, tail, json, settings),
        Commands::Types { file, json } => cmd_types(&file, json, settings),
        Commands::Stats { file, column, json } => cmd_stats(&file, column.as_deref(), json, settings),
        Commands::Corr {
            file,
            pairs,
            threshold,
            json,
        } => cmd_corr(&file, pairs, threshold, json, settings),
        Commands::Chart(chart) => cmd_chart(chart, settings),
        Commands::Profile { file } => cmd_profile(&file, settings),
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn output(msg: impl Into<String>) -> Self {
        Self { code: EXIT_OUTPUT, message: msg.into(), hint: None }
    }

    /// Load failures carry a hint for the common causes.
    pub fn load(path: &Path, err: LoadError) -> Self {
        let hint = match &err {
            LoadError::UnsupportedExtension(_) => Some("supported types are .csv, .tsv, .xls and .xlsx"),
            LoadError::Io(e) if e.kind() == io::ErrorKind::NotFound => Some("check the file path"),
            LoadError::Malformed { .. } => {
                Some("check the delimiter, or set \"loader\": { \"delimiter\": \";\" } in the settings file")
            }
            _ => None,
        };
        Self {
            code: EXIT_LOAD,
            message: format!("{}: {}", path.display(), err),
            hint: hint.map(str::to_string),
        }
    }

    pub fn render(err: RenderError) -> Self {
        Self { code: EXIT_RENDER, message: err.to_string(), hint: None }
    }

    pub fn settings(err: SettingsError) -> Self {
        Self::usage(err.to_string()).with_hint("settings are JSON; lines starting with // are ignored")
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Shared plumbing
// ============================================================================

fn load_settings(explicit: Option<&Path>) -> Result<Settings, CliError> {
    match explicit {
        Some(path) => Settings::from_path(path).map_err(CliError::settings),
        None => Ok(Settings::load()),
    }
}

fn load_table(path: &Path, settings: &Settings) -> Result<(Table, LoadReport), CliError> {
    let (table, report) = load_with_report(path, &settings.loader).map_err(|e| CliError::load(path, e))?;
    info!(
        "loaded {} ({} rows x {} columns)",
        path.display(),
        table.row_count(),
        table.column_count()
    );
    Ok((table, report))
}

fn write_stdout(text: &str) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{}", text).map_err(|e| CliError::output(format!("stdout: {}", e)))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| CliError::output(e.to_string()))?;
    write_stdout(&json)
}

/// Unavailable is a result: `null` in JSON, a notice in text. Both exit 0.
fn print_not_applicable(reason: &str, json: bool) -> Result<(), CliError> {
    debug!("not applicable: {reason}");
    if json {
        write_stdout("null")
    } else {
        write_stdout(&format!("not applicable: {reason}"))
    }
}

/// Why a numeric-only operation has nothing to report for `column`.
fn numeric_column_reason(table: &Table, column: &str) -> String {
    match table.column(column) {
        None => format!("no column named '{column}'"),
        Some(c) if !c.is_numeric() => format!("column '{column}' is not numeric"),
        Some(_) => format!("column '{column}' has no values"),
    }
}

// ============================================================================
// info / preview / types
// ============================================================================

fn cmd_info(file: &Path, json: bool, settings: &Settings) -> Result<(), CliError> {
    let (table, load) = load_table(file, settings)?;
    let info = basic_info(&table);
    if json {
        print_json(&serde_json::json!({ "info": info, "load": load }))
    } else {
        write_stdout(&report::info(file, &info, &load))
    }
}

fn cmd_preview(file: &Path, head: usize, tail: usize, json: bool, settings: &Settings) -> Result<(), CliError> {
    let (table, _) = load_table(file, settings)?;
    let preview = preview(&table, head, tail);
    if json {
        print_json(&preview)
    } else {
        write_stdout(&report::preview(&preview))
    }
}

fn cmd_types(file: &Path, json: bool, settings: &Settings) -> Result<(), CliError> {
    let (table, _) = load_table(file, settings)?;
    let types = classify_with(&table, &settings.classifier);
    if json {
        print_json(&types)
    } else {
        write_stdout(&report::types(&types))
    }
}

// ============================================================================
// stats / corr / profile
// ============================================================================

fn cmd_stats(file: &Path, column: Option<&str>, json: bool, settings: &Settings) -> Result<(), CliError> {
    let (table, _) = load_table(file, settings)?;

    if let Some(name) = column {
        return match column_stats(&table, name) {
            Some(stats) if json => print_json(&stats),
            Some(stats) => write_stdout(&report::column_stats(&stats)),
            None => print_not_applicable(&numeric_column_reason(&table, name), json),
        };
    }

    match table_stats(&table) {
        Some(stats) if json => print_json(&stats),
        Some(stats) => write_stdout(&report::stats(&stats)),
        None => print_not_applicable("no numeric columns", json),
    }
}

fn cmd_corr(
    file: &Path,
    pairs: bool,
    threshold: Option<f64>,
    json: bool,
    settings: &Settings,
) -> Result<(), CliError> {
    let mut options = settings.correlation.clone();
    if let Some(t) = threshold {
        if !(0.0..=1.0).contains(&t) {
            return Err(CliError::usage(format!("--threshold must be between 0 and 1, got {}", t)));
        }
        options.threshold = t;
    }

    let (table, _) = load_table(file, settings)?;
    if table.numeric_columns().count() < 2 {
        return print_not_applicable("fewer than two numeric columns", json);
    }

    if pairs {
        let pairs = correlation_pairs_with(&table, &options);
        if json {
            print_json(&pairs)
        } else {
            write_stdout(&report::pairs(&pairs))
        }
    } else {
        match correlation_matrix(&table) {
            Some(matrix) if json => print_json(&matrix),
            Some(matrix) => write_stdout(&report::matrix(&matrix)),
            None => print_not_applicable("fewer than two numeric columns", json),
        }
    }
}

fn cmd_profile(file: &Path, settings: &Settings) -> Result<(), CliError> {
    let (table, _) = load_table(file, settings)?;
    print_json(&profile_with(&table, &settings.profile_options()))
}

// ============================================================================
// chart
// ============================================================================

fn cmd_chart(command: ChartCommands, settings: &Settings) -> Result<(), CliError> {
    let mut options: ChartOptions = settings.charts.clone();

    let (artifact, output, reason) = match command {
        ChartCommands::Histogram { file, column, bins, output } => {
            if let Some(bins) = bins {
                options.bins = bins;
            }
            if options.bins == 0 || options.bins > MAX_BINS {
                return Err(CliError::usage(format!(
                    "--bins must be between 1 and {}, got {}",
                    MAX_BINS, options.bins
                )));
            }
            let (table, _) = load_table(&file, settings)?;
            let artifact = histogram_with(&table, &column, &options).map_err(CliError::render)?;
            (artifact, output, numeric_column_reason(&table, &column))
        }
        ChartCommands::Bar { file, column, max_categories, output } => {
            if let Some(max) = max_categories {
                options.max_categories = max;
            }
            if options.max_categories == 0 {
                return Err(CliError::usage("--max-categories must be at least 1"));
            }
            let (table, _) = load_table(&file, settings)?;
            let artifact = bar_chart_with(&table, &column, &options).map_err(CliError::render)?;
            let reason = match table.column(&column) {
                None => format!("no column named '{column}'"),
                Some(_) => format!("column '{column}' has no values"),
            };
            (artifact, output, reason)
        }
        ChartCommands::Heatmap { file, output } => {
            let (table, _) = load_table(&file, settings)?;
            let artifact = heatmap_with(&table, &options).map_err(CliError::render)?;
            (artifact, output, "fewer than two numeric columns".to_string())
        }
    };

    match artifact {
        Some(artifact) => emit_artifact(&artifact, output.as_deref()),
        None => print_not_applicable(&reason, false),
    }
}

fn emit_artifact(artifact: &ChartArtifact, output: Option<&Path>) -> Result<(), CliError> {
    match output {
        Some(path) => {
            let bytes = artifact.decode().map_err(CliError::render)?;
            fs::write(path, bytes).map_err(|e| CliError::output(format!("{}: {}", path.display(), e)))?;
            info!("wrote {} ({}x{})", path.display(), artifact.width, artifact.height);
            Ok(())
        }
        None => write_stdout(&artifact.to_data_uri()),
    }
}
