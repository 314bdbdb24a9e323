//! Pivot detection
//!
//! A bar is a pivot only once a full symmetric window exists on both sides,
//! so the first and last `n` bars of a series can never qualify. Equality
//! against the window extremum counts: a flat top spanning several bars
//! produces a pivot at each of them.

/// Is bar `i` a pivot high over the symmetric window [i-n, i+n]?
pub fn is_pivot_high(highs: &[f64], i: usize, n: usize) -> bool {
    if i < n || i + n >= highs.len() {
        return false;
    }

    let window_max = highs[i - n..=i + n]
        .iter()
        .fold(f64::NEG_INFINITY, |m, &h| m.max(h));

    highs[i] == window_max
}

/// Is bar `i` a pivot low over the symmetric window [i-n, i+n]?
pub fn is_pivot_low(lows: &[f64], i: usize, n: usize) -> bool {
    if i < n || i + n >= lows.len() {
        return false;
    }

    let window_min = lows[i - n..=i + n]
        .iter()
        .fold(f64::INFINITY, |m, &l| m.min(l));

    lows[i] == window_min
}
