//! CLI entry point for the exploratory analysis engine.

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use lex_explore::{AnalysisConfig, Analyzer};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Analyses selectable with `--task`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CliTask {
    /// Color-coded correlation table (.xlsx)
    Correlation,
    /// Scatter plots for strongly correlated numeric pairs
    Scatter,
    /// Pie charts of categorical columns
    Pie,
    /// Category-split histograms and cross-tab bar charts
    Histogram,
    /// Per-column statistics (.xlsx)
    Summary,
    /// Everything above, in that order
    All,
}

impl CliTask {
    const EVERY: [CliTask; 5] = [
        CliTask::Correlation,
        CliTask::Scatter,
        CliTask::Pie,
        CliTask::Histogram,
        CliTask::Summary,
    ];

    fn name(&self) -> &'static str {
        match self {
            Self::Correlation => "correlation",
            Self::Scatter => "scatter",
            Self::Pie => "pie",
            Self::Histogram => "histogram",
            Self::Summary => "summary",
            Self::All => "all",
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author = "Lex Machina Team",
    version,
    about = "No-code exploratory analysis of tabular data",
    long_about = "Writes a correlation table, exploratory charts and a column summary \
                  for a CSV or spreadsheet file.\n\n\
                  EXAMPLES:\n  \
                  # Everything, into ./outputs\n  \
                  lex-explore -i survey.csv --create-output\n\n  \
                  # Only scatter plots for |r| >= 0.8\n  \
                  lex-explore -i survey.xlsx -t scatter --threshold 0.8\n\n  \
                  # Pie charts and histograms with 20 bins\n  \
                  lex-explore -i survey.csv -t pie -t histogram --bins 20"
)]
struct Args {
    /// Path to the input file (.csv, .xlsx, .xls, .xlsm, .ods)
    #[arg(short, long)]
    input: PathBuf,

    /// Directory receiving the artifacts
    #[arg(short, long, default_value = "./outputs")]
    output: PathBuf,

    /// Create the output directory if it does not exist
    #[arg(long)]
    create_output: bool,

    /// Analysis to run; repeat the flag for several
    #[arg(short, long, value_enum, default_value = "all")]
    task: Vec<CliTask>,

    /// Minimum |r| for a scatter plot (0.0 - 1.0)
    #[arg(long)]
    threshold: Option<f64>,

    /// Number of histogram bins
    #[arg(long)]
    bins: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Suppress progress output (only show warnings and errors)
    #[arg(short, long)]
    quiet: bool,

    /// Print the column summary as JSON to stdout
    ///
    /// Disables all logs so stdout only holds the JSON document.
    #[arg(long)]
    json: bool,
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

/// Expand `all` and drop repeats, keeping first-seen order.
fn expand_tasks(requested: &[CliTask]) -> Vec<CliTask> {
    let mut tasks = Vec::new();
    for task in requested {
        let expanded: &[CliTask] = if *task == CliTask::All {
            &CliTask::EVERY
        } else {
            std::slice::from_ref(task)
        };
        for t in expanded {
            if !tasks.contains(t) {
                tasks.push(*t);
            }
        }
    }
    tasks
}

fn prepare_output_dir(output: &Path, create: bool) -> Result<()> {
    if output.is_dir() {
        return Ok(());
    }
    if !create {
        return Err(anyhow!(
            "Output directory does not exist: {} (pass --create-output to create it)",
            output.display()
        ));
    }
    std::fs::create_dir_all(output)
        .with_context(|| format!("Creating output directory {}", output.display()))?;
    info!("Created output directory: {}", output.display());
    Ok(())
}

fn run_task(analyzer: &Analyzer, task: CliTask, output: &Path) -> lex_explore::AnalysisResult<Vec<PathBuf>> {
    let config = analyzer.config();
    match task {
        CliTask::Correlation => analyzer.try_build_correlation(output).map(|p| vec![p]),
        CliTask::Scatter => analyzer
            .try_build_scatter(output, config.scatter_threshold)
            .map(|o| vec![o.directory]),
        CliTask::Pie => analyzer.try_build_pie(output).map(|o| vec![o.directory]),
        CliTask::Histogram => analyzer
            .try_build_histograms(output, config.histogram_bins)
            .map(|o| vec![o.directory]),
        CliTask::Summary => analyzer.try_summarize(output).map(|p| vec![p]),
        CliTask::All => Ok(Vec::new()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args.log_level, args.quiet, args.json);

    if !args.input.exists() {
        return Err(anyhow!("Input file not found: {}", args.input.display()));
    }
    prepare_output_dir(&args.output, args.create_output)?;

    let defaults = AnalysisConfig::default();
    let config = AnalysisConfig::builder()
        .scatter_threshold(args.threshold.unwrap_or(defaults.scatter_threshold))
        .histogram_bins(args.bins.unwrap_or(defaults.histogram_bins))
        .build()?;

    let analyzer = Analyzer::builder()
        .config(config)
        .on_progress(|update| {
            debug!(
                "[{:>3.0}%] {}: {}",
                update.progress * 100.0,
                update.stage.display_name(),
                update.message
            );
        })
        .build()?;

    let (rows, columns) = analyzer
        .try_load(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    info!(
        "Numeric columns: {:?}; categorical columns: {:?}",
        analyzer.numeric_columns(),
        analyzer.categorical_columns()
    );

    let tasks = expand_tasks(&args.task);
    let mut failed = Vec::new();
    let mut written = Vec::new();
    for task in &tasks {
        analyzer.reset();
        match run_task(&analyzer, *task, &args.output) {
            Ok(paths) => written.extend(paths.into_iter().map(|p| (task.name(), p))),
            Err(_) => failed.push(task.name()),
        }
    }

    if args.json {
        let summaries = analyzer.column_summaries()?;
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    } else if !args.quiet {
        println!("{}", "=".repeat(80));
        println!(
            "{} ({} rows x {} columns)",
            args.input.display(),
            rows,
            columns
        );
        println!("{}", "=".repeat(80));
        for (task, path) in &written {
            println!("  {:<12} {}", task, path.display());
        }
        for task in &failed {
            println!("  {:<12} FAILED", task);
        }
        println!("{}", "=".repeat(80));
    }

    if !failed.is_empty() {
        return Err(anyhow!(
            "{} of {} task(s) failed: {}",
            failed.len(),
            tasks.len(),
            failed.join(", ")
        ));
    }
    Ok(())
}
