//! Breakout scanner - main entry point
//!
//! This binary provides two subcommands:
//! - scan: run the full batch over the symbol universe
//! - inspect: scan a single symbol and print its recent computed rows

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser, Debug)]
#[command(name = "breakout-scanner")]
#[command(about = "Daily OHLCV breakout scanner with trendline and support/resistance signals", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Scan the whole universe and write the signal/computed reports
    Scan {
        /// Path to configuration file
        #[arg(short, long, default_value = "configs/scan.json")]
        config: String,

        /// Data directory (overrides config file)
        #[arg(long)]
        data_dir: Option<String>,

        /// Universe file (overrides config file)
        #[arg(long)]
        universe: Option<String>,

        /// Results directory (overrides config file)
        #[arg(long)]
        results_dir: Option<String>,

        /// Scan symbols sequentially instead of in parallel
        #[arg(long)]
        sequential: bool,
    },

    /// Scan a single symbol and print its most recent computed rows
    Inspect {
        /// Symbol to inspect (expects {data_dir}/{symbol}.csv)
        symbol: String,

        /// Path to configuration file
        #[arg(short, long, default_value = "configs/scan.json")]
        config: String,

        /// Number of rows to print from the end of the series
        #[arg(short, long, default_value = "15")]
        last: usize,
    },
}

fn setup_logging(verbose: bool, command_name: &str, file_only: bool) -> Result<()> {
    std::fs::create_dir_all("logs")?;

    let log_filename = format!(
        "{}_{}.log",
        command_name,
        chrono::Local::now().format("%Y-%m-%d_%H-%M-%S")
    );
    let log_path = PathBuf::from("logs").join(&log_filename);

    let level = if verbose { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let file_appender = tracing_appender::rolling::never("logs", &log_filename);

    if file_only {
        // Keep the console clean for the progress bar
        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(file_layer)
            .init();
    } else {
        let console_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(true);

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(true)
            .with_line_number(true)
            .with_file(true)
            .with_ansi(false);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .init();

        info!("Logging initialized");
        info!("Log file: {}", log_path.display());
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let (command_name, file_only) = match &cli.command {
        Commands::Scan { .. } => ("scan", true), // File-only for clean progress bar
        Commands::Inspect { .. } => ("inspect", false),
    };

    setup_logging(cli.verbose, command_name, file_only)?;

    match cli.command {
        Commands::Scan {
            config,
            data_dir,
            universe,
            results_dir,
            sequential,
        } => commands::scan::run(config, data_dir, universe, results_dir, sequential),

        Commands::Inspect {
            symbol,
            config,
            last,
        } => commands::inspect::run(symbol, config, last),
    }
}
