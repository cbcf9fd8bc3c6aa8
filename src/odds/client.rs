//! HTTP client for The Odds API v4.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, instrument, warn};

use super::source::OddsSource;
use super::types::{Match, OddsSnapshot, Quote};
use crate::config::{Config, OddsFormat};
use crate::error::SourceError;
use crate::metrics;

/// Header carrying the remaining request quota.
const REQUESTS_REMAINING_HEADER: &str = "x-requests-remaining";

/// One event in the odds feed.
#[derive(Debug, Clone, Deserialize)]
pub struct EventResponse {
    /// Event ID.
    pub id: Option<String>,
    /// Sport key.
    pub sport_key: Option<String>,
    /// Start time (RFC 3339).
    pub commence_time: Option<String>,
    /// Home side.
    pub home_team: Option<String>,
    /// Away side.
    pub away_team: Option<String>,
    /// Participant list (older feed versions).
    pub teams: Option<Vec<String>>,
    /// Bookmakers covering the event.
    #[serde(default, deserialize_with = "lenient_bookmakers")]
    pub bookmakers: Option<Vec<BookmakerResponse>>,
}

/// One bookmaker within an event.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookmakerResponse {
    /// Bookmaker key (e.g., "williamhill").
    pub key: Option<String>,
    /// Display name (e.g., "William Hill").
    pub title: Option<String>,
    /// Markets quoted.
    pub markets: Option<Vec<MarketResponse>>,
}

/// One market quoted by a bookmaker.
#[derive(Debug, Clone, Deserialize)]
pub struct MarketResponse {
    /// Market key (e.g., "h2h").
    pub key: Option<String>,
    /// Outcomes in feed order.
    pub outcomes: Option<Vec<OutcomeResponse>>,
}

/// One priced outcome.
#[derive(Debug, Clone, Deserialize)]
pub struct OutcomeResponse {
    /// Outcome name (team or "Draw").
    pub name: Option<String>,
    /// Decimal odds; an unparseable price reads as missing.
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<Decimal>,
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| match serde_json::from_value(value.clone()) {
        Ok(price) => Some(price),
        Err(e) => {
            warn!(price = %value, error = %e, "Unparseable outcome price");
            None
        }
    }))
}

/// Decode bookmakers one by one. A bookmaker that does not decode becomes
/// an empty record, which the detector treats as malformed.
fn lenient_bookmakers<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<BookmakerResponse>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| {
                    serde_json::from_value(item).unwrap_or_else(|e| {
                        warn!(error = %e, "Undecodable bookmaker entry");
                        BookmakerResponse::default()
                    })
                })
                .collect(),
        ),
        Some(Value::Null) | None => None,
        Some(other) => {
            warn!(kind = json_kind(&other), "Bookmakers field is not an array");
            None
        }
    })
}

/// The Odds API client.
#[derive(Debug, Clone)]
pub struct OddsApiClient {
    /// HTTP client for API requests.
    http: reqwest::Client,
    /// Base URL of the feed.
    base_url: String,
    /// API key.
    api_key: String,
    /// Sport/league key.
    sport: String,
    /// Bookmaker regions.
    regions: String,
    /// Market keys.
    markets: String,
    /// Odds format.
    odds_format: OddsFormat,
}

impl OddsApiClient {
    /// Create a new client from config.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .connect_timeout(Duration::from_secs(5))
            .tcp_keepalive(Duration::from_secs(30))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            http,
            base_url: config.odds_api_url.trim_end_matches('/').to_string(),
            api_key: config.odds_api_key.clone(),
            sport: config.sport.clone(),
            regions: config.regions.clone(),
            markets: config.markets.clone(),
            odds_format: config.odds_format,
        })
    }

    /// Sport key this client fetches.
    pub fn sport(&self) -> &str {
        &self.sport
    }

    /// Odds endpoint URL.
    pub fn odds_url(&self) -> String {
        format!("{}/v4/sports/{}/odds", self.base_url, self.sport)
    }

    /// Fetch raw events from the feed.
    #[instrument(skip(self), fields(sport = %self.sport))]
    pub async fn fetch_events(&self) -> Result<Vec<EventResponse>, SourceError> {
        let start = Instant::now();
        let odds_format = self.odds_format.to_string();

        let response = self
            .http
            .get(self.odds_url())
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", self.regions.as_str()),
                ("markets", self.markets.as_str()),
                ("oddsFormat", odds_format.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::SourceUnavailable(e.to_string()))?;

        metrics::record_fetch_latency(start);

        if let Some(remaining) = response
            .headers()
            .get(REQUESTS_REMAINING_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            debug!(remaining = %remaining, "Odds API quota");
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SourceError::SourceUnavailable(format!(
                "HTTP {} - {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SourceError::MalformedResponse(e.to_string()))?;

        parse_events(body)
    }
}

#[async_trait]
impl OddsSource for OddsApiClient {
    async fn fetch(&self) -> Result<OddsSnapshot, SourceError> {
        let events = self.fetch_events().await?;
        Ok(events_to_snapshot(&self.sport, events))
    }
}

/// Decode the response body, which must be a JSON array of events.
///
/// Events are decoded one at a time; an event that does not decode is
/// logged and dropped without affecting the rest of the body.
pub fn parse_events(body: Value) -> Result<Vec<EventResponse>, SourceError> {
    match body {
        Value::Array(items) => Ok(items
            .into_iter()
            .enumerate()
            .filter_map(|(index, item)| match serde_json::from_value(item) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(index, error = %e, "Dropping undecodable event");
                    None
                }
            })
            .collect()),
        Value::Null => Err(SourceError::MalformedResponse(
            "response body is null".to_string(),
        )),
        other => Err(SourceError::MalformedResponse(format!(
            "expected an array of events, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Normalize feed events into a snapshot.
pub fn events_to_snapshot(sport: &str, events: Vec<EventResponse>) -> OddsSnapshot {
    let matches = events.into_iter().map(convert_event).collect();
    OddsSnapshot::new(sport, matches)
}

fn convert_event(event: EventResponse) -> Match {
    let participants = match event.teams {
        Some(teams) if !teams.is_empty() => teams,
        _ => event
            .home_team
            .into_iter()
            .chain(event.away_team)
            .collect(),
    };

    let commence_time = event.commence_time.as_deref().and_then(|raw| {
        OffsetDateTime::parse(raw, &Rfc3339)
            .map_err(|e| warn!(commence_time = %raw, error = %e, "Unparseable commence_time"))
            .ok()
    });

    let quotes = event
        .bookmakers
        .unwrap_or_default()
        .into_iter()
        .map(convert_bookmaker)
        .collect();

    Match {
        id: event.id,
        participants,
        commence_time,
        quotes,
    }
}

/// Convert one bookmaker into a quote using its first market.
///
/// Missing fields are kept as gaps (empty name, truncated prices) so the
/// detector sees the record as malformed rather than never seeing it.
fn convert_bookmaker(bookmaker: BookmakerResponse) -> Quote {
    let name = bookmaker
        .title
        .filter(|t| !t.trim().is_empty())
        .or(bookmaker.key)
        .unwrap_or_default();

    let outcome_prices = bookmaker
        .markets
        .and_then(|markets| markets.into_iter().next())
        .and_then(|market| market.outcomes)
        .unwrap_or_default()
        .into_iter()
        .map_while(|outcome| outcome.price)
        .collect();

    Quote {
        bookmaker: name,
        outcome_prices,
    }
}
