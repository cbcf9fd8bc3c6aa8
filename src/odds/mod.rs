//! Odds module for bookmaker prices.
//!
//! This module handles:
//! - The normalized snapshot model
//! - The odds source contract
//! - The Odds API client
//! - Mock source for testing

pub mod client;
pub mod mock;
pub mod source;
pub mod types;

pub use client::OddsApiClient;
pub use mock::{MatchBuilder, MockOddsSource, SnapshotBuilder};
pub use source::{FileOddsSource, OddsSource};
pub use types::{Match, OddsSnapshot, Quote};
