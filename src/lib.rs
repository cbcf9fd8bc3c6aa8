//! Two-way sports-betting arbitrage scanner.
//!
//! Bookmakers price the same match independently. When one bookmaker's
//! price on the first outcome and another's price on the second outcome
//! imply probabilities summing to less than 1, staking both sides in
//! proportion to the inverse prices returns a profit whichever side wins:
//!
//! ```text
//! Bookmaker A, outcome 1:  2.10  ->  1/2.10 = 0.4762
//! Bookmaker B, outcome 2:  2.20  ->  1/2.20 = 0.4545
//! ──────────────────────────────────────────────────
//! Arbitrage value:                   0.9307 < 1 ✅
//! Profit margin:                     6.93%
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`odds`]: Snapshot model, odds sources and the Odds API client
//! - [`arbitrage`]: Opportunity detection
//! - [`notify`]: Notification sinks (console, log, webhook)
//! - [`scanner`]: Fetch/detect/publish cycle
//! - [`api`]: HTTP API for health, metrics and the dashboard
//! - [`metrics`]: Prometheus metrics
//! - [`utils`]: Utility functions

pub mod api;
pub mod arbitrage;
pub mod config;
pub mod error;
pub mod metrics;
pub mod notify;
pub mod odds;
pub mod scanner;
pub mod utils;

pub use arbitrage::{detect, Opportunity};
pub use config::Config;
pub use error::{BotError, Result};
pub use odds::{Match, OddsSnapshot, Quote};
