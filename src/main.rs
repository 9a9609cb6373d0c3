// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use report_analyzer::utils::{logging, truncate_text, Validator};
use report_analyzer::{
    AnalysisMode, CancelToken, Config, CsvExtractor, HistoryStore, PipelineOrchestrator,
    RunOptions, RunOutcome,
};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "report_analyzer")]
#[command(version = "0.1.0")]
#[command(about = "CSV analysis and PDF report pipeline", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV file and generate a PDF report
    Analyze {
        /// Path to the CSV file
        input: PathBuf,

        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Analysis depth; detailed adds the predictive pass
        #[arg(short, long, value_enum, default_value_t = Mode::Basic)]
        mode: Mode,

        /// Produce a report even when analysis fails
        #[arg(long)]
        best_effort: bool,

        /// Skip narrative synthesis even when an API key is configured
        #[arg(long)]
        skip_synthesis: bool,

        /// Suppress the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Print the inferred column types of a CSV file without analyzing it
    Inspect {
        /// Path to the CSV file
        input: PathBuf,
    },

    /// List recently generated reports
    History {
        #[arg(short, long, value_name = "NUM")]
        limit: Option<usize>,
    },

    /// Show the stored details of one past report
    Show {
        /// History entry id, as printed by the history command
        id: i64,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Basic,
    Detailed,
}

impl From<Mode> for AnalysisMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Basic => AnalysisMode::Basic,
            Mode::Detailed => AnalysisMode::Detailed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logger(cli.color, cli.verbose);

    info!("Loading configuration from: {}", cli.config.display());
    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    match cli.command {
        Commands::Analyze {
            input,
            output,
            mode,
            best_effort,
            skip_synthesis,
            quiet,
        } => {
            let options = RunOptions {
                input,
                output_dir: output,
                mode: mode.into(),
                best_effort,
                skip_synthesis,
                quiet,
            };
            cmd_analyze(&config, options).await?;
        }
        Commands::Inspect { input } => {
            cmd_inspect(&input).await?;
        }
        Commands::History { limit } => {
            cmd_history(&config, limit)?;
        }
        Commands::Show { id } => {
            cmd_show(&config, id)?;
        }
    }

    Ok(())
}

async fn cmd_analyze(config: &Config, options: RunOptions) -> Result<()> {
    Validator::validate_file_path(&options.input).context("Invalid input file")?;
    if let Err(e) = Validator::validate_csv_extension(&options.input) {
        warn!("{}", e);
    }

    let cancel = CancelToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, stopping after the current stage");
            signal_token.cancel();
        }
    });

    let orchestrator = PipelineOrchestrator::new(config.clone());
    match orchestrator
        .run(&options, &cancel)
        .await
        .context("Analysis run failed")?
    {
        RunOutcome::Completed(artifact) => {
            println!(
                "{}",
                logging::format_success(&format!("Report written to {}", artifact.path.display()))
            );
        }
        RunOutcome::Cancelled => {
            println!("{}", logging::format_warning("Run cancelled"));
        }
    }

    Ok(())
}

async fn cmd_inspect(input: &PathBuf) -> Result<()> {
    Validator::validate_file_path(input).context("Invalid input file")?;

    let path = input.clone();
    let dataset = tokio::task::spawn_blocking(move || CsvExtractor::new().extract(&path))
        .await
        .context("Extraction task failed")?
        .context("Could not read CSV file")?;

    println!(
        "{}: {} rows, {} columns, {} missing values",
        input.display().to_string().bold(),
        dataset.row_count(),
        dataset.column_count(),
        dataset.missing_total()
    );
    println!();
    println!("{:<30} {:<12} {:>8}", "COLUMN".bold(), "TYPE".bold(), "MISSING".bold());
    for column in dataset.columns() {
        println!(
            "{:<30} {:<12} {:>8}",
            truncate_text(&column.name, 30),
            column.column_type().as_str(),
            column.data.missing_count()
        );
    }

    Ok(())
}

fn cmd_history(config: &Config, limit: Option<usize>) -> Result<()> {
    let store =
        HistoryStore::open(&config.history.db_path).context("Could not open history store")?;
    let records = store
        .get_recent(limit.unwrap_or(config.history.recent_limit))
        .context("Could not read history")?;

    if records.is_empty() {
        println!("{}", logging::format_info("No reports generated yet"));
        return Ok(());
    }

    println!(
        "{:<6} {:<20} {:<28} {:<10} {}",
        "ID".bold(),
        "CREATED".bold(),
        "SOURCE".bold(),
        "MODE".bold(),
        "REPORT".bold()
    );
    for record in records {
        println!(
            "{:<6} {:<20} {:<28} {:<10} {}",
            record.id,
            record.created_at,
            truncate_text(&record.filename, 28),
            record.report_type,
            record.report_path
        );
    }

    Ok(())
}

fn cmd_show(config: &Config, id: i64) -> Result<()> {
    let store =
        HistoryStore::open(&config.history.db_path).context("Could not open history store")?;
    let Some(record) = store.get_details(id).context("Could not read history")? else {
        println!(
            "{}",
            logging::format_error(&format!("No history entry with id {}", id))
        );
        return Ok(());
    };

    println!("{}: {}", "Source".bold(), record.filename);
    println!("{}: {}", "Report".bold(), record.report_path);
    println!("{}: {}", "Mode".bold(), record.report_type);
    println!("{}: {}", "Created".bold(), record.created_at);
    println!(
        "{}: {}",
        "Metadata".bold(),
        serde_json::to_string_pretty(&record.metadata)?
    );
    println!(
        "{}:\n{}",
        "Analysis".bold(),
        truncate_text(&serde_json::to_string_pretty(&record.analysis_results)?, 4000)
    );

    Ok(())
}
