//! hotel-ingest CLI: merges hotel metadata and review files into one report.
//!
//! Usage:
//!   hotel-ingest run --hotels <file> --reviews <dir> [--output <file>] [--workers N]
//!   hotel-ingest check --hotels <file>

use clap::{Args, Parser, Subcommand};
use hotel_ingest::ingest::load_hotels;
use hotel_ingest::{ConfigError, HotelStore, IngestConfig, IngestSummary, Orchestrator};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hotel-ingest",
    version,
    about = "Concurrent hotel review ingestion"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load metadata, ingest every review file and write the report
    Run(RunArgs),
    /// Validate a hotel metadata document without ingesting reviews
    Check {
        /// Hotel metadata document
        #[arg(long)]
        hotels: PathBuf,
    },
}

#[derive(Args)]
struct RunArgs {
    /// YAML config file; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,
    /// Hotel metadata document
    #[arg(long)]
    hotels: Option<PathBuf>,
    /// Root directory of review documents
    #[arg(long)]
    reviews: Option<PathBuf>,
    /// Report destination
    #[arg(long)]
    output: Option<PathBuf>,
    /// Number of worker threads
    #[arg(long)]
    workers: Option<usize>,
    /// File name suffix of review documents
    #[arg(long)]
    suffix: Option<String>,
    /// Follow symbolic links in the review tree
    #[arg(long)]
    follow_links: bool,
    /// Give up waiting for outstanding files after this many seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Also write the run summary as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl RunArgs {
    /// Config file values (or defaults) overlaid with command line flags
    fn settings(&self) -> Result<IngestConfig, ConfigError> {
        let mut settings = match &self.config {
            Some(path) => IngestConfig::from_yaml_file(path)?,
            None => IngestConfig::default(),
        };
        if let Some(hotels) = &self.hotels {
            settings.hotels = hotels.clone();
        }
        if let Some(reviews) = &self.reviews {
            settings.reviews = reviews.clone();
        }
        if self.output.is_some() {
            settings.output = self.output.clone();
        }
        if let Some(workers) = self.workers {
            settings.workers = workers;
        }
        if let Some(suffix) = &self.suffix {
            settings.suffix = suffix.clone();
        }
        if self.follow_links {
            settings.follow_links = true;
        }
        if let Some(secs) = self.timeout_secs {
            settings.wait_timeout_ms = Some(secs.saturating_mul(1000));
        }
        Ok(settings)
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();
}

fn write_summary_json(path: &Path, summary: &IngestSummary) -> Result<(), String> {
    let json = serde_json::to_string_pretty(summary)
        .map_err(|e| format!("Failed to serialize summary: {}", e))?;
    std::fs::write(path, json).map_err(|e| format!("Failed to write {}: {}", path.display(), e))
}

fn cmd_run(args: &RunArgs) -> i32 {
    let settings = match args.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let run = match Orchestrator::new(settings).run() {
        Ok(run) => run,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let summary = &run.summary;
    println!(
        "Ingested {} reviews into {} hotels from {} files",
        summary.reviews_merged, summary.hotels_loaded, summary.files_dispatched
    );
    if !summary.is_clean() {
        println!(
            "{} issues ({} files failed, {} reviews rejected, {} reviews dropped)",
            summary.issues.len(),
            summary.files_failed,
            summary.reviews_rejected,
            summary.reviews_dropped
        );
    }

    if let Some(path) = &args.summary_json {
        if let Err(e) = write_summary_json(path, summary) {
            eprintln!("Error: {}", e);
            return 1;
        }
    }
    0
}

fn cmd_check(hotels: &Path) -> i32 {
    let store = HotelStore::new();
    let load = load_hotels(&store, hotels);
    println!("{} hotels loaded from {}", load.hotels_loaded, hotels.display());
    for issue in &load.issues {
        println!("{}", issue);
    }
    if load.hotels_loaded == 0 && !load.issues.is_empty() {
        1
    } else {
        0
    }
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    let code = match &cli.command {
        Commands::Run(args) => cmd_run(args),
        Commands::Check { hotels } => cmd_check(hotels),
    };
    std::process::exit(code);
}
