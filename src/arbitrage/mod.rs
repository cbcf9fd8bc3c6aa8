//! Arbitrage module for detecting two-way opportunities.
//!
//! This module handles:
//! - Arbitrage value and margin calculations
//! - Pairwise detection over odds snapshots

pub mod calculator;
pub mod detector;

pub use calculator::{arbitrage_value, profit_margin_percent, sort_by_margin, Opportunity};
pub use detector::{
    detect, detect_match, detect_with_summary, quote_pairs, try_detect, DetectionSummary,
};
