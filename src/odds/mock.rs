//! Mock odds source for unit testing.
//!
//! This module provides a source that can be used in tests
//! without making real network requests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::source::OddsSource;
use super::types::{Match, OddsSnapshot, Quote};
use crate::error::SourceError;

/// Configuration for mock source behavior.
#[derive(Debug, Clone, Default)]
pub struct MockConfig {
    /// Fail every fetch as unavailable.
    pub fail_unavailable: bool,
    /// Fail every fetch as malformed.
    pub fail_malformed: bool,
    /// Simulated latency in milliseconds.
    pub latency_ms: u64,
}

/// Mock odds source returning a preset snapshot.
#[derive(Debug, Clone)]
pub struct MockOddsSource {
    /// Mock configuration.
    config: MockConfig,
    /// Snapshot handed out on every fetch.
    snapshot: Arc<Mutex<OddsSnapshot>>,
    /// Number of fetches served.
    fetches: Arc<Mutex<u64>>,
}

impl MockOddsSource {
    /// Create a mock source serving the given snapshot.
    pub fn new(snapshot: OddsSnapshot) -> Self {
        Self::with_config(snapshot, MockConfig::default())
    }

    /// Create a mock source with custom configuration.
    pub fn with_config(snapshot: OddsSnapshot, config: MockConfig) -> Self {
        Self {
            config,
            snapshot: Arc::new(Mutex::new(snapshot)),
            fetches: Arc::new(Mutex::new(0)),
        }
    }

    /// Create a mock source that always fails as unavailable.
    pub fn unavailable() -> Self {
        Self::with_config(
            OddsSnapshot::new("mock", Vec::new()),
            MockConfig {
                fail_unavailable: true,
                ..Default::default()
            },
        )
    }

    /// Replace the snapshot served by later fetches.
    pub fn set_snapshot(&self, snapshot: OddsSnapshot) {
        *self.snapshot.lock().unwrap_or_else(|e| e.into_inner()) = snapshot;
    }

    /// Number of fetches served so far.
    pub fn fetch_count(&self) -> u64 {
        *self.fetches.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl OddsSource for MockOddsSource {
    async fn fetch(&self) -> Result<OddsSnapshot, SourceError> {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(self.config.latency_ms)).await;
        }

        *self.fetches.lock().unwrap_or_else(|e| e.into_inner()) += 1;

        if self.config.fail_unavailable {
            return Err(SourceError::SourceUnavailable(
                "Mock source failure".to_string(),
            ));
        }

        if self.config.fail_malformed {
            return Err(SourceError::MalformedResponse(
                "Mock malformed body".to_string(),
            ));
        }

        Ok(self.snapshot.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }
}

/// Builder for test snapshots.
pub struct SnapshotBuilder {
    sport: String,
    matches: Vec<Match>,
}

impl SnapshotBuilder {
    /// Create a new builder for the given sport key.
    pub fn new(sport: impl Into<String>) -> Self {
        Self {
            sport: sport.into(),
            matches: Vec::new(),
        }
    }

    /// Add a match.
    pub fn with_match(mut self, m: Match) -> Self {
        self.matches.push(m);
        self
    }

    /// Build the snapshot.
    pub fn build(self) -> OddsSnapshot {
        OddsSnapshot::new(self.sport, self.matches)
    }
}

/// Builder for test matches.
///
/// Quotes are stored as given, without validation, so malformed records
/// can be injected.
pub struct MatchBuilder {
    participants: Vec<String>,
    quotes: Vec<Quote>,
}

impl MatchBuilder {
    /// Create a new builder for a two-participant match.
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Self {
            participants: vec![home.into(), away.into()],
            quotes: Vec::new(),
        }
    }

    /// Add a bookmaker quote.
    pub fn quote(mut self, bookmaker: impl Into<String>, prices: &[Decimal]) -> Self {
        self.quotes.push(Quote {
            bookmaker: bookmaker.into(),
            outcome_prices: prices.to_vec(),
        });
        self
    }

    /// Build the match.
    pub fn build(self) -> Match {
        Match::new(self.participants, self.quotes)
    }
}
