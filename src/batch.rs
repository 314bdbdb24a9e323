//! Batch orchestration across the instrument universe
//!
//! Instruments are mutually independent, so the batch maps over symbols in
//! parallel, each with a freshly constructed scanner. The only barrier is
//! at the end: signals are globally sorted and filtered to the most recent
//! distinct trading dates observed across the whole batch.

use chrono::NaiveDate;
use indicatif::ProgressBar;
use itertools::Itertools;
use rayon::prelude::*;
use std::collections::HashMap;
use tracing::{info, warn};

use crate::config::ScanParams;
use crate::scanner::{SeriesOutput, SeriesScanner};
use crate::types::{Bar, BreakoutSignal, ComputedRow, Symbol};

/// Merged output of one batch run
#[derive(Debug, Default)]
pub struct BatchOutput {
    pub rows: Vec<ComputedRow>,
    pub signals: Vec<BreakoutSignal>,
    pub symbols_scanned: usize,
    pub symbols_skipped: usize,
}

/// Scan every instrument and merge the per-instrument outputs.
///
/// Empty series are skipped with a warning; a skipped instrument never
/// disturbs its siblings. Signals come back sorted by (date, symbol) and
/// restricted to the trailing `recent_date_window` distinct trading dates.
pub fn run_batch(
    data: &HashMap<Symbol, Vec<Bar>>,
    params: &ScanParams,
    progress: Option<&ProgressBar>,
    sequential: bool,
) -> BatchOutput {
    let mut symbols: Vec<&Symbol> = data.keys().collect();
    symbols.sort();

    let scan_one = |symbol: &&Symbol| -> Option<SeriesOutput> {
        let bars = &data[*symbol];

        let output = if bars.is_empty() {
            warn!("No bars for {}, skipping", symbol);
            None
        } else {
            Some(SeriesScanner::new((*symbol).clone(), bars, params.clone()).scan())
        };

        if let Some(pb) = progress {
            pb.inc(1);
        }
        output
    };

    let outputs: Vec<Option<SeriesOutput>> = if sequential {
        symbols.iter().map(scan_one).collect()
    } else {
        symbols.par_iter().map(scan_one).collect()
    };

    let symbols_skipped = outputs.iter().filter(|o| o.is_none()).count();
    let symbols_scanned = outputs.len() - symbols_skipped;

    let mut rows = Vec::new();
    let mut signals = Vec::new();
    for output in outputs.into_iter().flatten() {
        rows.extend(output.rows);
        signals.extend(output.signals);
    }

    let total_signals = signals.len();
    signals.sort_by(|a, b| (a.date, &a.symbol).cmp(&(b.date, &b.symbol)));

    // Every bar produced a row, so the rows carry the union of all trading
    // dates observed across the batch.
    let recent = recent_dates(rows.iter().map(|r| r.date), params.recent_date_window);
    let signals = filter_recent_signals(signals, &recent);

    info!(
        "Scanned {} symbols ({} skipped): {} rows, {} signals ({} within the {}-date window)",
        symbols_scanned,
        symbols_skipped,
        rows.len(),
        total_signals,
        signals.len(),
        params.recent_date_window,
    );

    BatchOutput {
        rows,
        signals,
        symbols_scanned,
        symbols_skipped,
    }
}

/// The `window` most recent distinct dates, ascending
pub fn recent_dates(dates: impl Iterator<Item = NaiveDate>, window: usize) -> Vec<NaiveDate> {
    let distinct: Vec<NaiveDate> = dates.unique().sorted().collect();
    let start = distinct.len().saturating_sub(window);
    distinct[start..].to_vec()
}

/// Keep only signals falling on one of the given dates
pub fn filter_recent_signals(
    signals: Vec<BreakoutSignal>,
    recent: &[NaiveDate],
) -> Vec<BreakoutSignal> {
    signals
        .into_iter()
        .filter(|s| recent.contains(&s.date))
        .collect()
}
