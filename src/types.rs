//! Core data types used across the scanner

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors for bar data
#[derive(Debug, Error)]
pub enum BarValidationError {
    #[error("high ({high}) must be >= low ({low})")]
    HighLessThanLow { high: f64, low: f64 },

    #[error("volume ({0}) must be >= 0")]
    NegativeVolume(f64),

    #[error("open ({open}) must be between low ({low}) and high ({high})")]
    OpenOutOfRange { open: f64, low: f64, high: f64 },

    #[error("close ({close}) must be between low ({low}) and high ({high})")]
    CloseOutOfRange { close: f64, low: f64, high: f64 },

    #[error("prices must be positive: open={open}, high={high}, low={low}, close={close}")]
    NonPositivePrice {
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    },
}

/// One daily OHLCV bar, immutable once loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    /// Create a new bar with validation
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Result<Self, BarValidationError> {
        let bar = Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        };
        bar.validate()?;
        Ok(bar)
    }

    /// Validate the bar data
    pub fn validate(&self) -> Result<(), BarValidationError> {
        if self.open <= 0.0 || self.high <= 0.0 || self.low <= 0.0 || self.close <= 0.0 {
            return Err(BarValidationError::NonPositivePrice {
                open: self.open,
                high: self.high,
                low: self.low,
                close: self.close,
            });
        }

        if self.high < self.low {
            return Err(BarValidationError::HighLessThanLow {
                high: self.high,
                low: self.low,
            });
        }

        if self.volume < 0.0 {
            return Err(BarValidationError::NegativeVolume(self.volume));
        }

        if self.open < self.low || self.open > self.high {
            return Err(BarValidationError::OpenOutOfRange {
                open: self.open,
                low: self.low,
                high: self.high,
            });
        }

        if self.close < self.low || self.close > self.high {
            return Err(BarValidationError::CloseOutOfRange {
                close: self.close,
                low: self.low,
                high: self.high,
            });
        }

        Ok(())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Instrument symbol using Arc<str> for cheap cloning
///
/// Symbols are cloned into every computed row and signal; Arc<str> keeps
/// those clones at O(1) instead of reallocating the string each time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(#[serde(with = "arc_str_serde")] std::sync::Arc<str>);

/// Custom serde for Arc<str>
mod arc_str_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::sync::Arc;

    pub fn serialize<S>(value: &Arc<str>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Arc<str>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Arc::from(s.as_str()))
    }
}

impl Symbol {
    pub fn new(s: impl AsRef<str>) -> Self {
        Symbol(std::sync::Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Breakout classification for a single bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BreakoutKind {
    #[default]
    None,
    Bullish,
    Bearish,
}

impl BreakoutKind {
    pub fn is_none(self) -> bool {
        self == BreakoutKind::None
    }

    /// Human-readable label for the trend-breakout column
    pub fn trend_label(self) -> &'static str {
        match self {
            BreakoutKind::None => "",
            BreakoutKind::Bullish => "Bullish Breakout",
            BreakoutKind::Bearish => "Bearish Breakout",
        }
    }

    /// Human-readable label for the price-breakout column
    pub fn price_label(self) -> &'static str {
        match self {
            BreakoutKind::None => "",
            BreakoutKind::Bullish => "Bullish Price Breakout",
            BreakoutKind::Bearish => "Bearish Price Breakdown",
        }
    }
}

/// Per-bar annotated record, emitted unconditionally for every bar
#[derive(Debug, Clone, Serialize)]
pub struct ComputedRow {
    pub symbol: Symbol,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub true_range: f64,
    pub atr: Option<f64>,
    pub slope: Option<f64>,
    pub pivot_high: bool,
    pub pivot_low: bool,
    pub upper_trend: Option<f64>,
    pub lower_trend: Option<f64>,
    pub trend_breakout: BreakoutKind,
    pub price_breakout: BreakoutKind,
    pub strength_pct: Option<f64>,
    pub volume_pct_of_sma: Option<f64>,
}

/// Discrete breakout event, emitted only when at least one kind is non-none
#[derive(Debug, Clone, Serialize)]
pub struct BreakoutSignal {
    pub symbol: Symbol,
    pub date: NaiveDate,
    pub open: f64,
    pub close: f64,
    pub trendline: Option<f64>,
    pub trend_breakout: BreakoutKind,
    pub price_breakout: BreakoutKind,
    pub strength_pct: Option<f64>,
    pub volume_pct_of_sma: Option<f64>,
}

/// Round to a fixed number of decimal places (for output records only;
/// internal math stays unrounded)
pub fn round_dp(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}
