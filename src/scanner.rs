//! Per-instrument series engine
//!
//! One deterministic forward pass over a fully materialized daily series.
//! All state (volatility estimates, trendline anchors, level sets) is owned
//! by the scanner instance, so instruments never share accumulators.

use tracing::debug;

use crate::config::ScanParams;
use crate::indicators::{atr, slope, true_range, volume_pct_of_sma};
use crate::levels::LevelSet;
use crate::pivot::{is_pivot_high, is_pivot_low};
use crate::trend::TrendChannel;
use crate::types::{round_dp, Bar, BreakoutKind, BreakoutSignal, ComputedRow, Symbol};

/// Output of one instrument's scan
#[derive(Debug, Default)]
pub struct SeriesOutput {
    pub rows: Vec<ComputedRow>,
    pub signals: Vec<BreakoutSignal>,
}

/// Scans one instrument's bars, one `step` per bar.
///
/// Indicator series are precomputed up front (they are pure functions of
/// the input); the mutable part is the trendline channel, the level sets
/// and the previous-bar snapshot threaded between steps.
pub struct SeriesScanner<'a> {
    symbol: Symbol,
    bars: &'a [Bar],
    params: ScanParams,
    highs: Vec<f64>,
    lows: Vec<f64>,
    tr: Vec<f64>,
    atr: Vec<Option<f64>>,
    slope: Vec<Option<f64>>,
    volume_pct: Vec<Option<f64>>,
    channel: TrendChannel,
    resistance: LevelSet,
    support: LevelSet,
    prev_close: Option<f64>,
    // Buffered trendline values as recorded on the previous bar. A pivot on
    // the current bar re-anchors the channel, so these cannot be recomputed
    // from the current anchors.
    prev_upper: Option<f64>,
    prev_lower: Option<f64>,
}

impl<'a> SeriesScanner<'a> {
    pub fn new(symbol: Symbol, bars: &'a [Bar], params: ScanParams) -> Self {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let volumes: Vec<f64> = bars.iter().map(|b| b.volume).collect();

        let tr = true_range(&highs, &lows, &closes);
        let atr_values = atr(&highs, &lows, &closes, params.length);
        let slope_values = slope(&atr_values, params.length, params.multiplier);
        let volume_pct = volume_pct_of_sma(&volumes, params.volume_sma_window);

        let resistance = LevelSet::new(params.level_tolerance);
        let support = LevelSet::new(params.level_tolerance);

        SeriesScanner {
            symbol,
            bars,
            params,
            highs,
            lows,
            tr,
            atr: atr_values,
            slope: slope_values,
            volume_pct,
            channel: TrendChannel::new(),
            resistance,
            support,
            prev_close: None,
            prev_upper: None,
            prev_lower: None,
        }
    }

    /// Advance the scan by one bar: detect pivots, re-anchor trendlines,
    /// accumulate levels, classify the bar, and roll the previous-bar
    /// snapshot forward.
    pub fn step(&mut self, i: usize) -> (ComputedRow, Option<BreakoutSignal>) {
        let bar = &self.bars[i];
        let n = self.params.length;

        let pivot_high = is_pivot_high(&self.highs, i, n);
        let pivot_low = is_pivot_low(&self.lows, i, n);

        if pivot_high {
            let anchor_slope = self.slope[i].unwrap_or(0.0);
            self.channel.anchor_upper(i, bar.high, anchor_slope);
            if self.resistance.insert(bar.high) {
                debug!("{}: new resistance level {} at bar {}", self.symbol, bar.high, i);
            }
        }
        if pivot_low {
            let anchor_slope = self.slope[i].unwrap_or(0.0);
            self.channel.anchor_lower(i, bar.low, anchor_slope);
            if self.support.insert(bar.low) {
                debug!("{}: new support level {} at bar {}", self.symbol, bar.low, i);
            }
        }

        let buffer = self.params.trend_buffer;
        let upper = self.channel.buffered_upper_at(i, buffer);
        let lower = self.channel.buffered_lower_at(i, buffer);
        let volume_pct = self.volume_pct[i];

        // Bar 0 acts as its own previous bar, which suppresses any trigger
        // on the very first bar.
        let (prev_close, prev_upper, prev_lower) = if i == 0 {
            (bar.close, upper, lower)
        } else {
            (
                self.prev_close.unwrap_or(bar.close),
                self.prev_upper,
                self.prev_lower,
            )
        };

        let mut trend_kind = BreakoutKind::None;
        let mut price_kind = BreakoutKind::None;
        let mut strength: Option<f64> = None;

        let gate_open = volume_pct
            .map(|v| v > self.params.volume_surge_threshold)
            .unwrap_or(false);

        if gate_open {
            // First level in insertion order decides; a support breakdown
            // outranks a resistance breakout on the same bar.
            if self.resistance.iter().any(|level| bar.close > level) {
                price_kind = BreakoutKind::Bullish;
            }
            if self.support.iter().any(|level| bar.close < level) {
                price_kind = BreakoutKind::Bearish;
            }

            if let (Some(up), Some(prev_up), Some(anchor)) =
                (upper, prev_upper, self.channel.upper_anchor())
            {
                if bar.close > up && prev_close < prev_up && i - anchor.index > n {
                    trend_kind = BreakoutKind::Bullish;
                    strength = (up != 0.0).then(|| (bar.close - up) / up * 100.0);
                }
            }
            if trend_kind.is_none() {
                if let (Some(down), Some(prev_down), Some(anchor)) =
                    (lower, prev_lower, self.channel.lower_anchor())
                {
                    if bar.close < down && prev_close > prev_down && i - anchor.index > n {
                        trend_kind = BreakoutKind::Bearish;
                        strength = (down != 0.0).then(|| (down - bar.close) / down * 100.0);
                    }
                }
            }
        }

        let row = ComputedRow {
            symbol: self.symbol.clone(),
            date: bar.date,
            open: round_dp(bar.open, 5),
            high: round_dp(bar.high, 5),
            low: round_dp(bar.low, 5),
            close: round_dp(bar.close, 5),
            true_range: round_dp(self.tr[i], 5),
            atr: self.atr[i].map(|v| round_dp(v, 5)),
            slope: self.slope[i].map(|v| round_dp(v, 8)),
            pivot_high,
            pivot_low,
            upper_trend: upper.map(|v| round_dp(v, 5)),
            lower_trend: lower.map(|v| round_dp(v, 5)),
            trend_breakout: trend_kind,
            price_breakout: price_kind,
            strength_pct: strength.map(|v| round_dp(v, 2)),
            volume_pct_of_sma: volume_pct.map(|v| round_dp(v, 2)),
        };

        let signal = (!trend_kind.is_none() || !price_kind.is_none()).then(|| BreakoutSignal {
            symbol: self.symbol.clone(),
            date: bar.date,
            open: round_dp(bar.open, 5),
            close: round_dp(bar.close, 5),
            trendline: upper.map(|v| round_dp(v, 5)),
            trend_breakout: trend_kind,
            price_breakout: price_kind,
            strength_pct: strength.map(|v| round_dp(v, 2)),
            volume_pct_of_sma: volume_pct.map(|v| round_dp(v, 2)),
        });

        self.prev_close = Some(bar.close);
        self.prev_upper = upper;
        self.prev_lower = lower;

        (row, signal)
    }

    /// Drive all bars in chronological order
    pub fn scan(mut self) -> SeriesOutput {
        let mut rows = Vec::with_capacity(self.bars.len());
        let mut signals = Vec::new();

        for i in 0..self.bars.len() {
            let (row, signal) = self.step(i);
            rows.push(row);
            if let Some(signal) = signal {
                debug!(
                    "{}: {} / {} on {}",
                    signal.symbol,
                    signal.trend_breakout.trend_label(),
                    signal.price_breakout.price_label(),
                    signal.date
                );
                signals.push(signal);
            }
        }

        SeriesOutput { rows, signals }
    }
}
