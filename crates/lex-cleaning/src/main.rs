//! CLI entry point for the dataset cleaning pipeline.

use anyhow::{Result, anyhow};
use clap::Parser;
use lex_cleaning::reporting::DEFAULT_OUTPUT_NAME;
use lex_cleaning::sample::{DEFAULT_SAMPLE_ROWS, DEFAULT_SAMPLE_SEED};
use lex_cleaning::{
    CleaningConfig, CleaningReport, ColumnPruner, Dataset, Deduplicator, MissingValueAnalyzer,
    Pipeline, ReportGenerator, SampleGenerator, config, io,
};
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Name of the file a generated sample dataset is saved as.
const SAMPLE_FILE_NAME: &str = "dataset.csv";

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "Missing-value cleaning for tabular datasets",
    long_about = "Analyzes missing values, drops sparse columns, imputes the rest \
                  (median for numeric, mode for categorical) and removes duplicate rows.\n\n\
                  EXAMPLES:\n  \
                  # Clean a CSV file\n  \
                  lex-cleaning -i data.csv\n\n  \
                  # Generate and clean a 200-row sample dataset\n  \
                  lex-cleaning --rows 200 --seed 7\n\n  \
                  # Preview the missing-value analysis\n  \
                  lex-cleaning -i data.csv --dry-run\n\n  \
                  # Custom column vocabulary\n  \
                  lex-cleaning -i data.csv --numeric-columns height,weight --categorical-columns team"
)]
struct Args {
    /// Path to the CSV file to clean
    ///
    /// If not specified, a sample dataset is generated
    #[arg(short, long)]
    input: Option<String>,

    /// Rows of the generated sample dataset
    #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
    rows: usize,

    /// Seed of the generated sample dataset
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SEED)]
    seed: u64,

    /// Output directory for results
    #[arg(short, long, default_value = "./outputs")]
    output: String,

    /// Custom output file name (without extension)
    ///
    /// If not specified, uses "cleaned_dataset"
    #[arg(long)]
    output_name: Option<String>,

    /// Missing column threshold
    ///
    /// Columns whose missing ratio is strictly above this value are dropped
    #[arg(long, default_value_t = config::DEFAULT_MISSING_COLUMN_THRESHOLD)]
    threshold: f64,

    /// Columns imputed with the median (comma-separated)
    #[arg(long, value_delimiter = ',')]
    numeric_columns: Option<Vec<String>>,

    /// Columns imputed with the mode (comma-separated)
    #[arg(long, value_delimiter = ',')]
    categorical_columns: Option<Vec<String>>,

    /// Keep duplicate rows
    #[arg(long)]
    keep_duplicates: bool,

    /// Preview the missing-value analysis without cleaning
    #[arg(long)]
    dry_run: bool,

    /// Output JSON to stdout instead of human-readable summary
    ///
    /// Disables all progress logs; only outputs the final JSON report.
    #[arg(long)]
    json: bool,

    /// Write a detailed JSON report to the output directory
    ///
    /// The report will be saved as <input_name>_report.json
    #[arg(short = 'r', long)]
    emit_report: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show errors and final result)
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Input description used in reports and summaries.
    fn input_label(&self) -> String {
        match &self.input {
            Some(path) => path.clone(),
            None => format!("generated sample ({} rows, seed {})", self.rows, self.seed),
        }
    }

    fn report_stem(&self) -> String {
        self.input
            .as_deref()
            .map(extract_file_stem)
            .unwrap_or_else(|| "dataset".to_string())
    }
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
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    if !args.dry_run && !Path::new(&args.output).exists() {
        std::fs::create_dir_all(&args.output)?;
        info!("Created output directory: {}", args.output);
    }

    let data = load_dataset(&args)?;
    info!(
        "Dataset ready: {} rows x {} columns",
        data.len(),
        data.column_count()
    );

    let config = build_config(&args)?;

    if args.dry_run {
        return run_dry_run(&args, &config, &data);
    }

    let mut builder = Pipeline::builder().config(config);
    if !args.quiet && !args.json {
        builder = builder.on_progress(|update| {
            info!(
                "[{:.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        });
    }

    run_pipeline(builder.build()?, &args, &data)
}

/// Read the input file, or generate a sample dataset when none is given.
///
/// A generated dataset is saved next to the outputs unless this is a dry run.
fn load_dataset(args: &Args) -> Result<Dataset> {
    if let Some(ref input) = args.input {
        if !Path::new(input).exists() {
            return Err(anyhow!("Input file not found: {}", input));
        }
        info!("Loading dataset from: {}", input);
        return Ok(io::read_csv(input)?);
    }

    info!(
        "Generating sample dataset ({} rows, seed {})",
        args.rows, args.seed
    );
    let data = SampleGenerator::new(args.rows).with_seed(args.seed).generate();

    if !args.dry_run {
        let path = PathBuf::from(&args.output).join(SAMPLE_FILE_NAME);
        io::write_csv(&data, &path)?;
        info!("Sample dataset saved to: {}", path.display());
    }

    Ok(data)
}

fn build_config(args: &Args) -> Result<CleaningConfig> {
    let mut config_builder = CleaningConfig::builder()
        .missing_column_threshold(args.threshold)
        .remove_duplicates(!args.keep_duplicates)
        .output_dir(&args.output)
        .generate_reports(args.emit_report);

    if let Some(ref columns) = args.numeric_columns {
        config_builder = config_builder.numeric_columns(columns);
    }
    if let Some(ref columns) = args.categorical_columns {
        config_builder = config_builder.categorical_columns(columns);
    }
    if let Some(ref name) = args.output_name {
        config_builder = config_builder.output_name(name);
    }

    Ok(config_builder.build()?)
}

/// Print the missing-value analysis and what cleaning would do.
///
/// Uses `println!` on purpose: this is the output of `--dry-run`, shown
/// regardless of log level.
fn run_dry_run(args: &Args, config: &CleaningConfig, data: &Dataset) -> Result<()> {
    println!("\n{}", "=".repeat(80));
    println!("DRY RUN - Preview of cleaning actions");
    println!("{}\n", "=".repeat(80));

    println!("DATASET OVERVIEW");
    println!("{}", "-".repeat(40));
    println!("  Source: {}", args.input_label());
    println!("  Rows: {}", data.len());
    println!("  Columns: {}", data.column_count());
    println!();

    println!("MISSING VALUES");
    println!("{}", "-".repeat(40));

    let stats = MissingValueAnalyzer::analyze(data)?;
    println!(
        "{:<20} {:>8} {:>10}  {:<10} {}",
        "Column", "Missing", "Percent", "Severity", ""
    );
    println!("{}", "-".repeat(70));

    for (name, missing) in stats.iter() {
        println!(
            "{:<20} {:>8} {:>9.1}%  {:<10} {}",
            truncate_str(name, 19),
            missing.count,
            missing.percentage,
            missing.severity.display_name(),
            severity_bar(missing.percentage)
        );
    }
    println!();

    println!("CLEANING PREVIEW");
    println!("{}", "-".repeat(40));

    let pruner = ColumnPruner::new(config.missing_column_threshold);
    let to_drop = pruner.columns_to_drop(data);
    if to_drop.is_empty() {
        println!(
            "  No columns exceed {:.0}% missing threshold",
            config.missing_column_threshold * 100.0
        );
    } else {
        println!(
            "  Will drop columns with >{:.0}% missing: {:?}",
            config.missing_column_threshold * 100.0,
            to_drop
        );
    }

    println!("  Numeric columns (median): {:?}", config.numeric_columns);
    println!(
        "  Categorical columns (mode): {:?}",
        config.categorical_columns
    );

    if config.remove_duplicates {
        let duplicates = Deduplicator::count_duplicates(data);
        if duplicates > 0 {
            println!("  Will remove {} duplicate rows (before imputation)", duplicates);
        } else {
            println!("  No duplicate rows found before imputation");
        }
    } else {
        println!("  Duplicate rows will be kept");
    }
    println!();

    println!("OUTPUT FILES (will be created)");
    println!("{}", "-".repeat(40));
    let output_name = args.output_name.as_deref().unwrap_or(DEFAULT_OUTPUT_NAME);
    if args.input.is_none() {
        println!("  - {}/{}", args.output, SAMPLE_FILE_NAME);
    }
    println!("  - {}/{}.csv", args.output, output_name);
    if args.emit_report {
        println!("  - {}/{}_report.json", args.output, args.report_stem());
    }
    println!();

    println!("{}", "=".repeat(80));
    println!("To execute this cleaning, run without --dry-run");
    println!("{}", "=".repeat(80));

    Ok(())
}

/// Twenty-character bar, one block per 5%.
fn severity_bar(percentage: f64) -> String {
    let filled = ((percentage / 5.0).round() as usize).min(20);
    format!("{}{}", "#".repeat(filled), ".".repeat(20 - filled))
}

/// Truncate a string to max length with ellipsis
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Run pipeline and print results
fn run_pipeline(pipeline: Pipeline, args: &Args, data: &Dataset) -> Result<()> {
    info!("{}", "=".repeat(80));
    info!("Starting cleaning pipeline...");
    info!("{}", "=".repeat(80));

    let result = pipeline.process(data).map_err(|e| {
        error!("Pipeline failed: {}", e);
        anyhow!("Pipeline failed: {}", e)
    })?;

    let config = pipeline.config();
    let generator = ReportGenerator::new(config.output_dir.clone(), config.output_name.clone());
    let output_path = generator.write_dataset(&result.cleaned)?;
    let output_file = output_path.display().to_string();
    info!("Cleaned dataset written to: {}", output_file);

    let report =
        ReportGenerator::build_report(&args.input_label(), Some(&output_file), &result);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if args.emit_report {
        let report_path = generator.write_report_to_file(&report, &args.report_stem())?;
        info!("Report written to: {}", report_path.display());
    }

    if !args.json {
        print_human_readable_summary(&report);
    }

    Ok(())
}

/// Extract the file stem (name without extension) from a path.
fn extract_file_stem(path: &str) -> String {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Print a human-readable before/after summary.
fn print_human_readable_summary(report: &CleaningReport) {
    let stats = &report.comparison;

    println!();
    println!("{}", "=".repeat(80));
    println!("CLEANING COMPLETE");
    println!("{}", "=".repeat(80));
    println!();

    println!(
        "Input:  {} ({} rows x {} columns)",
        report.input_file, stats.row_count_before, stats.column_count_before
    );
    if let Some(ref output_file) = report.output_file {
        println!(
            "Output: {} ({} rows x {} columns)",
            output_file, stats.row_count_after, stats.column_count_after
        );
    }
    println!();

    println!("Cleaning Summary:");
    println!(
        "  Rows: {} -> {} ({} removed)",
        stats.row_count_before, stats.row_count_after, report.summary.rows_removed
    );
    println!(
        "  Columns: {} -> {} ({} removed)",
        stats.column_count_before, stats.column_count_after, report.summary.columns_removed
    );
    println!(
        "  Missing values: {} -> {} ({} filled)",
        stats.missing_count_before, stats.missing_count_after, report.summary.values_filled
    );
    println!(
        "  Completeness: {:.1}% -> {:.1}% ({:+.1} points)",
        stats.completeness_before,
        stats.completeness_after,
        report.summary.completeness_improvement
    );
    if !stats.dropped_columns.is_empty() {
        println!("  Dropped columns: {}", stats.dropped_columns.join(", "));
    }
    println!();

    if !report.actions.is_empty() {
        println!("Actions Taken:");
        for action in report.actions.iter().take(10) {
            println!(
                "  - [{}] {}",
                action.action_type.display_name(),
                action.description
            );
        }
        if report.actions.len() > 10 {
            println!("  ... and {} more actions", report.actions.len() - 10);
        }
        println!();
    }

    if !report.warnings.is_empty() {
        println!("Warnings:");
        for warning in &report.warnings {
            println!("  ! {}", warning);
        }
        println!();
    }

    if report.validation.fully_imputed {
        println!("Validation: no missing values remain");
    } else {
        println!(
            "Validation: {} missing values remain in {}",
            report.validation.remaining_missing,
            report.validation.columns_with_missing.join(", ")
        );
    }
    println!();

    println!("Use --json for machine-readable output");
    println!("Use --emit-report to save detailed JSON report");
    println!("{}", "=".repeat(80));
}
