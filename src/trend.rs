//! Trendline projection
//!
//! Two independent anchors, one per direction. Each anchor is replaced when
//! a new pivot of its direction fires and is then extrapolated forward with
//! the slope captured at the anchor bar: the upper (resistance) line decays
//! downward, the lower (support) line rises.

/// Most recent pivot anchor for one direction
#[derive(Debug, Clone, Copy)]
pub struct TrendAnchor {
    pub index: usize,
    pub price: f64,
    pub slope: f64,
}

/// Pair of trendline anchors with projection helpers
#[derive(Debug, Clone, Default)]
pub struct TrendChannel {
    upper: Option<TrendAnchor>,
    lower: Option<TrendAnchor>,
}

impl TrendChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-anchor the upper (resistance) line at a new pivot high
    pub fn anchor_upper(&mut self, index: usize, price: f64, slope: f64) {
        self.upper = Some(TrendAnchor {
            index,
            price,
            slope,
        });
    }

    /// Re-anchor the lower (support) line at a new pivot low
    pub fn anchor_lower(&mut self, index: usize, price: f64, slope: f64) {
        self.lower = Some(TrendAnchor {
            index,
            price,
            slope,
        });
    }

    pub fn upper_anchor(&self) -> Option<&TrendAnchor> {
        self.upper.as_ref()
    }

    pub fn lower_anchor(&self) -> Option<&TrendAnchor> {
        self.lower.as_ref()
    }

    /// Projected upper trendline at bar `i`, undefined before the first
    /// pivot high
    pub fn upper_at(&self, i: usize) -> Option<f64> {
        self.upper
            .map(|a| a.price - a.slope * (i - a.index) as f64)
    }

    /// Projected lower trendline at bar `i`, undefined before the first
    /// pivot low
    pub fn lower_at(&self, i: usize) -> Option<f64> {
        self.lower
            .map(|a| a.price + a.slope * (i - a.index) as f64)
    }

    /// Upper line inflated by the noise guard band
    pub fn buffered_upper_at(&self, i: usize, buffer: f64) -> Option<f64> {
        self.upper_at(i).map(|v| v * (1.0 + buffer))
    }

    /// Lower line deflated by the noise guard band
    pub fn buffered_lower_at(&self, i: usize, buffer: f64) -> Option<f64> {
        self.lower_at(i).map(|v| v * (1.0 - buffer))
    }
}
