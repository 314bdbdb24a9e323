//! Report writing
//!
//! Persists the two batch artifacts as CSV: the filtered breakout signals
//! and the full computed table. Dates are rendered as `02-Jan-2024` in both
//! files.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::OutputConfig;
use crate::types::{BreakoutSignal, ComputedRow};

fn fmt_date(date: NaiveDate) -> String {
    date.format("%d-%b-%Y").to_string()
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write both artifacts under the results directory.
///
/// An empty batch is a hard failure: writing empty files would silently
/// hide an upstream data problem.
pub fn write_all(
    output: &OutputConfig,
    rows: &[ComputedRow],
    signals: &[BreakoutSignal],
) -> Result<(PathBuf, PathBuf)> {
    if rows.is_empty() {
        anyhow::bail!("Batch produced no computed rows, refusing to write empty artifacts");
    }

    std::fs::create_dir_all(&output.results_dir).context("Failed to create results directory")?;

    let signals_path = Path::new(&output.results_dir).join(&output.signals_file);
    let computed_path = Path::new(&output.results_dir).join(&output.computed_file);

    write_signals(&signals_path, signals)?;
    write_computed(&computed_path, rows)?;

    Ok((signals_path, computed_path))
}

/// Write the filtered breakout signal table
pub fn write_signals(path: impl AsRef<Path>, signals: &[BreakoutSignal]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path.as_ref()).context("Failed to create signals file")?;

    writer.write_record([
        "Symbol",
        "Date",
        "Open",
        "Close",
        "Trendline",
        "Trend_Breakout",
        "Price_Breakout",
        "Breakout Strength (%)",
        "Volume % of SMA",
    ])?;

    for signal in signals {
        writer.write_record([
            signal.symbol.as_str().to_string(),
            fmt_date(signal.date),
            signal.open.to_string(),
            signal.close.to_string(),
            fmt_opt(signal.trendline),
            signal.trend_breakout.trend_label().to_string(),
            signal.price_breakout.price_label().to_string(),
            fmt_opt(signal.strength_pct),
            fmt_opt(signal.volume_pct_of_sma),
        ])?;
    }

    writer.flush()?;
    info!(
        "Saved {} signals to {}",
        signals.len(),
        path.as_ref().display()
    );
    Ok(())
}

/// Write the full per-bar computed table
pub fn write_computed(path: impl AsRef<Path>, rows: &[ComputedRow]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path.as_ref()).context("Failed to create computed file")?;

    writer.write_record([
        "Symbol",
        "Date",
        "Open",
        "High",
        "Low",
        "Close",
        "TR",
        "ATR",
        "Slope",
        "Pivot High",
        "Pivot Low",
        "Upper Trend",
        "Lower Trend",
        "Trend_Breakout",
        "Price_Breakout",
        "Breakout Strength (%)",
        "Volume % of SMA",
    ])?;

    for row in rows {
        writer.write_record([
            row.symbol.as_str().to_string(),
            fmt_date(row.date),
            row.open.to_string(),
            row.high.to_string(),
            row.low.to_string(),
            row.close.to_string(),
            row.true_range.to_string(),
            fmt_opt(row.atr),
            fmt_opt(row.slope),
            row.pivot_high.to_string(),
            row.pivot_low.to_string(),
            fmt_opt(row.upper_trend),
            fmt_opt(row.lower_trend),
            row.trend_breakout.trend_label().to_string(),
            row.price_breakout.price_label().to_string(),
            fmt_opt(row.strength_pct),
            fmt_opt(row.volume_pct_of_sma),
        ])?;
    }

    writer.flush()?;
    info!("Saved {} rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}
