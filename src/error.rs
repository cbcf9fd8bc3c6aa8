//! Unified error types for the odds scanner.

use thiserror::Error;

/// Unified error type for the odds scanner.
#[derive(Error, Debug)]
pub enum BotError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Odds source error.
    #[error("odds source error: {0}")]
    Source(#[from] SourceError),

    /// Arbitrage detection error.
    #[error("arbitrage error: {0}")]
    Arbitrage(#[from] ArbitrageError),

    /// Notification error.
    #[error("notification error: {0}")]
    Notify(#[from] NotifyError),

    /// HTTP request error.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while producing an odds snapshot.
///
/// The scanner treats either variant as a cycle with zero opportunities.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The feed could not be reached or answered with a non-success status.
    #[error("odds source unavailable: {0}")]
    SourceUnavailable(String),

    /// The feed answered, but the body is not a list of events.
    #[error("malformed odds response: {0}")]
    MalformedResponse(String),
}

/// Arbitrage detection errors.
///
/// Only [`ArbitrageError::InvalidSnapshot`] ever reaches a caller of the
/// detector; the other two are recovered locally by skipping the record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArbitrageError {
    /// A quote lacks required fields or carries a non-positive price.
    #[error("malformed quote from {bookmaker:?}: {reason}")]
    MalformedQuote {
        /// Bookmaker name as received (may be empty).
        bookmaker: String,
        /// What is wrong with the quote.
        reason: String,
    },

    /// A match has fewer than two usable quotes.
    #[error("insufficient quotes: need 2, have {available}")]
    InsufficientQuotes {
        /// Number of quotes present.
        available: usize,
    },

    /// No snapshot was supplied.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

impl ArbitrageError {
    /// Shorthand for a [`ArbitrageError::MalformedQuote`].
    pub fn malformed(bookmaker: impl Into<String>, reason: impl Into<String>) -> Self {
        ArbitrageError::MalformedQuote {
            bookmaker: bookmaker.into(),
            reason: reason.into(),
        }
    }
}

/// Alert delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// The alert endpoint rejected the request.
    #[error("alert rejected: HTTP {status}")]
    Rejected {
        /// Status code returned by the endpoint.
        status: u16,
    },

    /// The alert request could not be sent.
    #[error("alert delivery failed: {0}")]
    DeliveryFailed(#[from] reqwest::Error),
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, BotError>;
