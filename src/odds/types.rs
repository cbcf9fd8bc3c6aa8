//! Normalized odds data: quotes, matches and the per-cycle snapshot.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::ArbitrageError;

/// Minimum number of outcome slots a quote needs for two-way analysis.
pub const MIN_OUTCOMES: usize = 2;

/// One bookmaker's decimal odds for one match.
///
/// `outcome_prices` follows the match-wide outcome order: slot 0 is the
/// same side for every quote of the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    /// Bookmaker display name.
    pub bookmaker: String,
    /// Decimal odds, one per outcome slot.
    pub outcome_prices: Vec<Decimal>,
}

impl Quote {
    /// Create a quote, rejecting missing fields and non-positive prices.
    pub fn new(
        bookmaker: impl Into<String>,
        outcome_prices: Vec<Decimal>,
    ) -> Result<Self, ArbitrageError> {
        let quote = Self {
            bookmaker: bookmaker.into(),
            outcome_prices,
        };
        quote.validate()?;

        if let Some(price) = quote.outcome_prices.iter().find(|p| **p <= Decimal::ZERO) {
            return Err(ArbitrageError::malformed(
                quote.bookmaker.clone(),
                format!("non-positive price {}", price),
            ));
        }

        Ok(quote)
    }

    /// Check that the bookmaker is named and both outcome slots exist.
    ///
    /// Prices are not range-checked here; a deserialized quote with a
    /// non-positive price only disqualifies the pairs that read it.
    pub fn validate(&self) -> Result<(), ArbitrageError> {
        if self.bookmaker.trim().is_empty() {
            return Err(ArbitrageError::malformed(
                self.bookmaker.clone(),
                "missing bookmaker name",
            ));
        }

        if self.outcome_prices.len() < MIN_OUTCOMES {
            return Err(ArbitrageError::malformed(
                self.bookmaker.clone(),
                format!(
                    "expected at least {} outcome prices, got {}",
                    MIN_OUTCOMES,
                    self.outcome_prices.len()
                ),
            ));
        }

        Ok(())
    }

    /// Price at an outcome slot, if present.
    pub fn price(&self, slot: usize) -> Option<Decimal> {
        self.outcome_prices.get(slot).copied()
    }

    /// Number of outcome slots quoted.
    pub fn outcome_count(&self) -> usize {
        self.outcome_prices.len()
    }
}

/// One sporting event and every bookmaker quote covering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Feed identifier, when the feed provides one.
    #[serde(default)]
    pub id: Option<String>,
    /// Competitor names, in feed order.
    pub participants: Vec<String>,
    /// Scheduled start.
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub commence_time: Option<OffsetDateTime>,
    /// Bookmaker quotes, any order.
    #[serde(default)]
    pub quotes: Vec<Quote>,
}

impl Match {
    /// Create a match with no feed id or start time.
    pub fn new(participants: Vec<String>, quotes: Vec<Quote>) -> Self {
        Self {
            id: None,
            participants,
            commence_time: None,
            quotes,
        }
    }

    /// Human-readable label, e.g. "Arsenal vs Chelsea".
    pub fn label(&self) -> String {
        if self.participants.is_empty() {
            return self.id.clone().unwrap_or_else(|| "unknown match".to_string());
        }
        self.participants.join(" vs ")
    }
}

/// Everything one fetch cycle produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsSnapshot {
    /// Sport/league key the snapshot was fetched for.
    pub sport: String,
    /// When the snapshot was assembled.
    #[serde(with = "time::serde::rfc3339")]
    pub fetched_at: OffsetDateTime,
    /// Matches in feed order.
    matches: Vec<Match>,
}

impl OddsSnapshot {
    /// Create a snapshot stamped with the current time.
    pub fn new(sport: impl Into<String>, matches: Vec<Match>) -> Self {
        Self {
            sport: sport.into(),
            fetched_at: OffsetDateTime::now_utc(),
            matches,
        }
    }

    /// Create a snapshot with an explicit timestamp.
    pub fn at(sport: impl Into<String>, fetched_at: OffsetDateTime, matches: Vec<Match>) -> Self {
        Self {
            sport: sport.into(),
            fetched_at,
            matches,
        }
    }

    /// Matches in feed order.
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Number of matches.
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    /// Whether the snapshot holds no matches.
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Total quotes across all matches.
    pub fn quote_count(&self) -> usize {
        self.matches.iter().map(|m| m.quotes.len()).sum()
    }
}
