//! Scan command implementation

use anyhow::Result;
use breakout_scanner::{batch, data, report, Config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

pub fn run(
    config_path: String,
    data_dir_override: Option<String>,
    universe_override: Option<String>,
    results_dir_override: Option<String>,
    sequential: bool,
) -> Result<()> {
    info!("Starting scan");

    let mut config = Config::from_file(&config_path)?;
    info!("Loaded configuration from: {}", config_path);

    if let Some(data_dir) = data_dir_override {
        info!("Overriding data directory to: {}", data_dir);
        config.data.data_dir = data_dir;
    }

    if let Some(universe) = universe_override {
        info!("Overriding universe file to: {}", universe);
        config.data.universe_file = universe;
    }

    if let Some(results_dir) = results_dir_override {
        info!("Overriding results directory to: {}", results_dir);
        config.output.results_dir = results_dir;
    }

    let symbols = data::load_universe(&config.data.universe_file)?;
    let data = data::load_multi_symbol(&config.data.data_dir, &symbols)?;
    info!("Loaded data for {} of {} symbols", data.len(), symbols.len());

    let pb = ProgressBar::new(data.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )?
        .progress_chars("#>-"),
    );

    let output = batch::run_batch(&data, &config.scan, Some(&pb), sequential);
    pb.finish_and_clear();

    let (signals_path, computed_path) =
        report::write_all(&config.output, &output.rows, &output.signals)?;

    println!("\n{}", "=".repeat(60));
    println!("SCAN RESULTS");
    println!("{}", "=".repeat(60));
    println!("Symbols scanned:    {}", output.symbols_scanned);
    println!("Symbols skipped:    {}", output.symbols_skipped);
    println!("Computed rows:      {}", output.rows.len());
    println!(
        "Signals (last {:>2} trading dates): {}",
        config.scan.recent_date_window,
        output.signals.len()
    );
    println!("Signals file:       {}", signals_path.display());
    println!("Computed file:      {}", computed_path.display());
    println!("{}", "=".repeat(60));

    info!("Scan completed successfully");

    Ok(())
}
