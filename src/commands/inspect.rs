//! Inspect command implementation
//!
//! Scans one symbol and prints the tail of its computed table plus every
//! signal the series generated (unfiltered by the batch date window), for
//! eyeballing a single instrument.

use anyhow::Result;
use breakout_scanner::scanner::SeriesScanner;
use breakout_scanner::{data, Config, Symbol};
use std::path::Path;
use tracing::info;

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
}

pub fn run(symbol: String, config_path: String, last: usize) -> Result<()> {
    let config = Config::from_file(&config_path)?;

    let symbol = Symbol::new(symbol);
    let path = Path::new(&config.data.data_dir).join(format!("{}.csv", symbol.as_str()));
    let bars = data::load_csv(&path)?;

    if bars.is_empty() {
        anyhow::bail!("No bars loaded for {}", symbol);
    }
    info!("Loaded {} bars for {}", bars.len(), symbol);

    let output = SeriesScanner::new(symbol.clone(), &bars, config.scan.clone()).scan();

    println!(
        "{:<12} {:>10} {:>10} {:>10} {:>10} {:>8} {:>10} {:>10} {:>8}",
        "Date", "Close", "TR", "ATR", "UpTrend", "DnTrend", "Vol%SMA", "Strength", "Pivot"
    );

    let start = output.rows.len().saturating_sub(last);
    for row in &output.rows[start..] {
        let pivot = match (row.pivot_high, row.pivot_low) {
            (true, true) => "H+L",
            (true, false) => "H",
            (false, true) => "L",
            (false, false) => "-",
        };

        println!(
            "{:<12} {:>10.2} {:>10.2} {:>10} {:>10} {:>8} {:>10} {:>10} {:>8}",
            row.date.format("%d-%b-%Y"),
            row.close,
            row.true_range,
            fmt_opt(row.atr),
            fmt_opt(row.upper_trend),
            fmt_opt(row.lower_trend),
            fmt_opt(row.volume_pct_of_sma),
            fmt_opt(row.strength_pct),
            pivot
        );
    }

    if output.signals.is_empty() {
        println!("\nNo breakout signals for {}", symbol);
    } else {
        println!("\nBreakout signals for {}:", symbol);
        for signal in &output.signals {
            println!(
                "  {}  close={:<10.2} trend={:<18} price={:<24} strength={}",
                signal.date.format("%d-%b-%Y"),
                signal.close,
                signal.trend_breakout.trend_label(),
                signal.price_breakout.price_label(),
                fmt_opt(signal.strength_pct)
            );
        }
    }

    Ok(())
}
