//! Volatility and volume indicators
//!
//! Undefined values (not enough history yet) are carried as `None` rather
//! than fabricated numbers; downstream logic treats `None` as "suppress".

/// Calculate Simple Moving Average
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut result = Vec::with_capacity(values.len());

    for i in 0..values.len() {
        if i + 1 < period {
            result.push(None);
        } else {
            let sum: f64 = values[i + 1 - period..=i].iter().sum();
            result.push(Some(sum / period as f64));
        }
    }

    result
}

/// Calculate True Range
///
/// Bar 0 has no previous close, so its TR is just the high/low spread.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Vec<f64> {
    let mut tr = Vec::with_capacity(high.len());

    for i in 0..high.len() {
        let tr_value = if i == 0 {
            high[i] - low[i]
        } else {
            let hl = high[i] - low[i];
            let hc = (high[i] - close[i - 1]).abs();
            let lc = (low[i] - close[i - 1]).abs();
            hl.max(hc).max(lc)
        };
        tr.push(tr_value);
    }

    tr
}

/// Calculate Average True Range as a simple moving average of True Range
pub fn atr(high: &[f64], low: &[f64], close: &[f64], period: usize) -> Vec<Option<f64>> {
    let tr = true_range(high, low, close);
    sma(&tr, period)
}

/// Per-bar trendline slope: ATR / period * multiplier
pub fn slope(atr_values: &[Option<f64>], period: usize, multiplier: f64) -> Vec<Option<f64>> {
    atr_values
        .iter()
        .map(|v| v.map(|a| a / period as f64 * multiplier))
        .collect()
}

/// Volume as percent deviation from its rolling SMA
///
/// The window includes the current bar, so a surge bar inflates its own
/// baseline: pct = (v - SMA_w(..=v)) / SMA_w(..=v) * 100.
pub fn volume_pct_of_sma(volume: &[f64], window: usize) -> Vec<Option<f64>> {
    let avg = sma(volume, window);

    volume
        .iter()
        .zip(avg.iter())
        .map(|(&v, a)| {
            a.and_then(|a| {
                if a == 0.0 {
                    None
                } else {
                    Some((v - a) / a * 100.0)
                }
            })
        })
        .collect()
}
