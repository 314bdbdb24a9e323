//! Integration tests for the breakout scanner
//!
//! These exercise the full per-instrument engine and the batch layer on
//! synthetic series with analytically known outcomes.

use chrono::{Duration, NaiveDate};
use std::collections::HashMap;

use breakout_scanner::batch::{self, filter_recent_signals, recent_dates};
use breakout_scanner::config::ScanParams;
use breakout_scanner::scanner::SeriesScanner;
use breakout_scanner::{Bar, BreakoutKind, Symbol};

// =============================================================================
// Test Utilities
// =============================================================================

fn day(i: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i)
}

fn flat_bar(i: i64) -> Bar {
    Bar {
        date: day(i),
        open: 95.0,
        high: 110.0,
        low: 90.0,
        close: 95.0,
        volume: 1000.0,
    }
}

/// 40 bars of flat 90-110 range with one engineered pivot high at bar 14
/// (high 120) and one engineered breakout at bar 30 (close above the
/// projected upper trendline on doubled volume).
///
/// With N = 14: TR is 20 everywhere except 30 at bar 14, so the slope
/// captured at the pivot is ((13*20 + 30) / 14) / 14. The upper trendline
/// decays from 120 and its buffered value at bar 30 is
/// (120 - slope * 16) * 1.005 = 96.80816...; close 98 crosses it with
/// strength 1.2311... (rounds to 1.23).
fn engineered_breakout_series(breakout_close: f64) -> Vec<Bar> {
    (0..40)
        .map(|i| {
            let mut bar = flat_bar(i);
            if i == 14 {
                bar.high = 120.0;
            }
            if i == 30 {
                bar.close = breakout_close;
                bar.volume = 2000.0;
            }
            bar
        })
        .collect()
}

fn scan(bars: &[Bar]) -> breakout_scanner::scanner::SeriesOutput {
    SeriesScanner::new(Symbol::new("TEST"), bars, ScanParams::default()).scan()
}

// =============================================================================
// Degenerate series
// =============================================================================

#[test]
fn test_series_shorter_than_full_window_has_no_pivots() {
    // 2N+1 = 29 bars required for any pivot with N = 14
    let bars: Vec<Bar> = (0..28).map(flat_bar).collect();
    let output = scan(&bars);

    assert_eq!(output.rows.len(), 28);
    assert!(output
        .rows
        .iter()
        .all(|r| !r.pivot_high && !r.pivot_low));
    assert!(output.rows.iter().all(|r| r.upper_trend.is_none()));
    assert!(output.signals.is_empty());
}

#[test]
fn test_insufficient_history_leaves_atr_undefined() {
    let bars: Vec<Bar> = (0..10).map(flat_bar).collect();
    let output = scan(&bars);

    assert_eq!(output.rows.len(), 10);
    assert!(output.rows.iter().all(|r| r.atr.is_none() && r.slope.is_none()));
    assert!(output.signals.is_empty());
}

#[test]
fn test_first_bar_true_range_is_the_spread() {
    let bars: Vec<Bar> = (0..5).map(flat_bar).collect();
    let output = scan(&bars);

    assert_eq!(output.rows[0].true_range, 20.0);
    for (i, row) in output.rows.iter().enumerate() {
        assert!(row.true_range >= bars[i].high - bars[i].low);
    }
}

// =============================================================================
// Engineered end-to-end breakout
// =============================================================================

#[test]
fn test_engineered_bullish_trend_breakout() {
    let bars = engineered_breakout_series(98.0);
    let output = scan(&bars);

    assert_eq!(output.rows.len(), 40);
    assert!(output.rows[14].pivot_high);

    assert_eq!(output.signals.len(), 1);
    let signal = &output.signals[0];
    assert_eq!(signal.date, day(30));
    assert_eq!(signal.trend_breakout, BreakoutKind::Bullish);
    assert_eq!(signal.price_breakout, BreakoutKind::None);
    assert_eq!(signal.strength_pct, Some(1.23));
    assert_eq!(signal.volume_pct_of_sma, Some(90.48));

    // The row mirrors the signal
    let row = &output.rows[30];
    assert_eq!(row.trend_breakout, BreakoutKind::Bullish);
    assert_eq!(row.strength_pct, Some(1.23));
}

#[test]
fn test_breakout_respects_minimum_bars_since_anchor() {
    // Re-running the engineered series: the only signal sits 16 bars past
    // the anchor at 14, and nothing fires inside the exclusion window.
    let bars = engineered_breakout_series(98.0);
    let output = scan(&bars);

    for signal in &output.signals {
        let i = (signal.date - day(0)).num_days() as usize;
        assert!(i - 14 > 14, "signal at bar {} too close to its anchor", i);
    }
}

#[test]
fn test_flat_lows_collapse_to_one_support_level() {
    // Bars 14..=25 are all pivot lows at 90 (equality tie-break); the
    // level set must dedupe them to a single entry, so no bar can trigger
    // more than one breakdown against duplicated levels.
    let bars = engineered_breakout_series(98.0);
    let output = scan(&bars);

    let pivot_low_count = output.rows.iter().filter(|r| r.pivot_low).count();
    assert_eq!(pivot_low_count, 12);
    // close 98 at bar 30 is above 90, so the deduped support level never
    // produces a breakdown
    assert!(output
        .signals
        .iter()
        .all(|s| s.price_breakout != BreakoutKind::Bearish));
}

#[test]
fn test_zero_rounded_strength_still_emits_signal() {
    // Close a hair above the buffered trendline: strength rounds to 0.00
    // but the signal must still be emitted.
    let slope = ((13.0 * 20.0 + 30.0) / 14.0) / 14.0 * 1.0;
    let buffered_upper_30 = (120.0 - slope * 16.0) * (1.0 + 0.005);

    let bars = engineered_breakout_series(buffered_upper_30 + 1e-9);
    let output = scan(&bars);

    assert_eq!(output.signals.len(), 1);
    let signal = &output.signals[0];
    assert_eq!(signal.trend_breakout, BreakoutKind::Bullish);
    assert_eq!(signal.strength_pct, Some(0.0));
}

#[test]
fn test_volume_gate_suppresses_engineered_breakout() {
    // Same price action, but the breakout bar's volume stays at baseline:
    // the gate closes and no signal survives, while the computed row still
    // carries the trendline.
    let mut bars = engineered_breakout_series(98.0);
    bars[30].volume = 1000.0;
    let output = scan(&bars);

    assert!(output.signals.is_empty());
    assert!(output.rows[30].upper_trend.is_some());
    assert_eq!(output.rows[30].trend_breakout, BreakoutKind::None);
}

// =============================================================================
// Batch-level date filtering
// =============================================================================

#[test]
fn test_recent_date_filter_drops_oldest_five_of_fifteen() {
    let signals: Vec<breakout_scanner::BreakoutSignal> = (0..15)
        .map(|i| breakout_scanner::BreakoutSignal {
            symbol: Symbol::new("TEST"),
            date: day(i),
            open: 100.0,
            close: 101.0,
            trendline: None,
            trend_breakout: BreakoutKind::Bullish,
            price_breakout: BreakoutKind::None,
            strength_pct: Some(1.0),
            volume_pct_of_sma: Some(75.0),
        })
        .collect();

    let recent = recent_dates((0..15).map(day), 10);
    let filtered = filter_recent_signals(signals, &recent);

    assert_eq!(filtered.len(), 10);
    assert!(filtered.iter().all(|s| s.date >= day(5)));
    assert!(!filtered.iter().any(|s| s.date < day(5)));
}

#[test]
fn test_batch_filters_against_dates_from_all_instruments() {
    // QUIET contributes 10 later trading dates but no signals; its dates
    // must still push LOUD's earlier signal out of the window.
    let loud = engineered_breakout_series(98.0); // signal on day(30)
    let quiet: Vec<Bar> = (31..51).map(flat_bar).collect();

    let mut data = HashMap::new();
    data.insert(Symbol::new("LOUD"), loud);
    data.insert(Symbol::new("QUIET"), quiet);

    let mut params = ScanParams::default();
    params.recent_date_window = 10;

    let output = batch::run_batch(&data, &params, None, true);
    // Union of dates is day(0)..day(50); the last 10 are day(41)..day(50),
    // so the day(30) signal is filtered out.
    assert!(output.signals.is_empty());
    assert_eq!(output.rows.len(), 60);

    // Widening the window far enough brings the signal back
    params.recent_date_window = 25;
    let output = batch::run_batch(&data, &params, None, true);
    assert_eq!(output.signals.len(), 1);
    assert_eq!(output.signals[0].symbol.as_str(), "LOUD");
}

#[test]
fn test_batch_signals_sorted_by_date_then_symbol() {
    let mut data = HashMap::new();
    for name in ["ZETA", "ALPHA"] {
        data.insert(Symbol::new(name), engineered_breakout_series(98.0));
    }

    let output = batch::run_batch(&data, &ScanParams::default(), None, false);
    assert_eq!(output.signals.len(), 2);
    assert_eq!(output.signals[0].symbol.as_str(), "ALPHA");
    assert_eq!(output.signals[1].symbol.as_str(), "ZETA");
}
