//! Breakout Scanner
//!
//! Scans daily OHLCV history for a universe of instruments, annotating
//! every bar with volatility, pivot, and trendline fields, and emitting
//! breakout signals when price crosses a projected trendline or a stored
//! support/resistance level on a volume surge.

pub mod batch;
pub mod config;
pub mod data;
pub mod indicators;
pub mod levels;
pub mod pivot;
pub mod report;
pub mod scanner;
pub mod trend;
pub mod types;

pub use config::Config;
pub use types::*;
