//! Data loading
//!
//! Reads per-symbol OHLCV history and the symbol universe from disk. The
//! market-data provider itself (whatever produced those files) is outside
//! this crate.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::{Bar, Symbol};

/// Load OHLCV bars from a CSV file with header
/// `date,open,high,low,close,volume` (dates as YYYY-MM-DD)
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Bar>> {
    let mut reader = csv::Reader::from_path(path.as_ref()).context("Failed to open CSV file")?;

    let mut bars = Vec::new();

    for (row_idx, result) in reader.records().enumerate() {
        let record = result.context(format!("Failed to read row {}", row_idx + 1))?;

        let date_str = record.get(0).context("Missing date column")?;
        let date = date_str
            .parse::<NaiveDate>()
            .context(format!("Failed to parse date: {}", date_str))?;

        let open: f64 = record
            .get(1)
            .context("Missing open column")?
            .parse()
            .context("Failed to parse open")?;
        let high: f64 = record
            .get(2)
            .context("Missing high column")?
            .parse()
            .context("Failed to parse high")?;
        let low: f64 = record
            .get(3)
            .context("Missing low column")?
            .parse()
            .context("Failed to parse low")?;
        let close: f64 = record
            .get(4)
            .context("Missing close column")?
            .parse()
            .context("Failed to parse close")?;
        let volume: f64 = record
            .get(5)
            .context("Missing volume column")?
            .parse()
            .context("Failed to parse volume")?;

        let bar = Bar {
            date,
            open,
            high,
            low,
            close,
            volume,
        };

        if let Err(e) = bar.validate() {
            warn!(
                "{}: row {}: {}",
                path.as_ref().display(),
                row_idx + 1,
                e
            );
        }

        bars.push(bar);
    }

    // The input contract says ordered-by-date; enforce it anyway
    bars.sort_by_key(|b| b.date);
    bars.dedup_by_key(|b| b.date);

    Ok(bars)
}

/// Load the symbol universe from a plain-text list, one symbol per line.
/// Blank lines and `#` comments are ignored.
pub fn load_universe(path: impl AsRef<Path>) -> Result<Vec<Symbol>> {
    let contents =
        std::fs::read_to_string(path.as_ref()).context("Failed to read universe file")?;

    let symbols: Vec<Symbol> = contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Symbol::new)
        .collect();

    if symbols.is_empty() {
        anyhow::bail!("Universe file {} contains no symbols", path.as_ref().display());
    }

    info!("Loaded {} symbols from {}", symbols.len(), path.as_ref().display());
    Ok(symbols)
}

/// Load bars for multiple symbols from `{data_dir}/{symbol}.csv` files.
/// Missing files are skipped with a warning; fails only when nothing loads.
pub fn load_multi_symbol(
    data_dir: impl AsRef<Path>,
    symbols: &[Symbol],
) -> Result<HashMap<Symbol, Vec<Bar>>> {
    let mut data = HashMap::new();

    for symbol in symbols {
        let filename = format!("{}.csv", symbol.as_str());
        let path = data_dir.as_ref().join(&filename);

        if !path.exists() {
            warn!("Data file not found: {}", path.display());
            continue;
        }

        let bars = load_csv(&path).context(format!("Failed to load data for {}", symbol))?;

        info!("Loaded {} bars for {}", bars.len(), symbol);
        data.insert(symbol.clone(), bars);
    }

    if data.is_empty() {
        anyhow::bail!("No data loaded for any symbol");
    }

    Ok(data)
}
