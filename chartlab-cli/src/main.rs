//! ChartLab CLI — instrument history download and comparison charts.
//!
//! Commands:
//! - `chart` — fetch each instrument's full daily history, persist CSVs,
//!   render per-instrument charts plus the raw/min-max/z-score comparisons
//! - `validate` — checksum-check a watchlist without fetching anything

use anyhow::Result;
use chartlab_core::chart::SvgRenderer;
use chartlab_core::data::{read_watchlist, CsvStore, YahooProvider};
use chartlab_core::domain::Isin;
use chartlab_runner::{prepare_layout, run_batch, RunConfig, StdoutProgress};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(
    name = "chartlab",
    about = "ChartLab CLI — instrument history download and comparison charts"
)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch, store, and chart every instrument in the watchlist.
    Chart {
        /// Watchlist: one ISIN per line, or a CSV of (identifier, title).
        #[arg(short, long)]
        input_file: PathBuf,

        /// Output directory; csv/ and img/ are created beneath it.
        #[arg(short, long)]
        output_dir: PathBuf,
    },
    /// Checksum-check the watchlist without fetching anything.
    Validate {
        /// Watchlist: one ISIN per line, or a CSV of (identifier, title).
        #[arg(short, long)]
        input_file: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Chart {
            input_file,
            output_dir,
        } => run_chart(input_file, output_dir),
        Commands::Validate { input_file } => run_validate(&input_file),
    }
}

/// Verbosity is decided once here from the CLI flag and handed to the
/// subscriber; no component reads a global debug toggle.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run_chart(input_file: PathBuf, output_dir: PathBuf) -> Result<()> {
    let config = RunConfig {
        input_file,
        output_dir,
    };

    // The only fatal conditions: unreadable input, unwritable output.
    let layout = prepare_layout(&config)?;
    let entries = read_watchlist(&config.input_file)?;

    let provider = YahooProvider::new();
    let store = CsvStore::new(&layout.csv_dir);
    let renderer = SvgRenderer::new();

    let summary = run_batch(
        &provider,
        &store,
        &renderer,
        &layout.img_dir,
        &entries,
        &StdoutProgress,
    );

    for report in &summary.reports {
        if let Err(e) = &report.outcome {
            eprintln!("Error for {}: {e}", report.code);
        }
    }
    println!(
        "Fetched data for {} out of {} instruments.",
        summary.succeeded, summary.total
    );

    // Per-item failures are already reported; a completed batch exits 0.
    Ok(())
}

fn run_validate(input_file: &PathBuf) -> Result<()> {
    let entries = read_watchlist(input_file)?;
    let mut valid = 0;
    let mut invalid = 0;

    for entry in &entries {
        match Isin::parse(&entry.code) {
            Ok(isin) => {
                valid += 1;
                println!("  OK: {isin}");
            }
            Err(e) => {
                invalid += 1;
                println!("  INVALID: {}: {e}", entry.code);
            }
        }
    }

    println!("\n{valid} valid, {invalid} invalid out of {} entries", entries.len());
    Ok(())
}
