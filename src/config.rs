//! Application configuration loaded from environment variables.

use serde::Deserialize;
use strum::{Display, EnumString};
use url::Url;

/// Odds format requested from the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum OddsFormat {
    /// European decimal odds (2.10 pays 2.10 per unit staked).
    #[default]
    Decimal,
    /// Moneyline odds (+110 / -150).
    American,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Odds Feed ===
    /// API key for the odds feed.
    pub odds_api_key: String,

    /// Sport/league key (e.g., "soccer_epl").
    #[serde(default = "default_sport")]
    pub sport: String,

    /// Comma-separated bookmaker regions.
    #[serde(default = "default_regions")]
    pub regions: String,

    /// Comma-separated market keys.
    #[serde(default = "default_markets")]
    pub markets: String,

    /// Odds format; the detector only understands decimal odds.
    #[serde(default)]
    pub odds_format: OddsFormat,

    /// Odds feed base URL.
    #[serde(default = "default_odds_api_url")]
    pub odds_api_url: String,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,

    // === Scanning ===
    /// Seconds between fetch cycles.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    // === Alerts ===
    /// Send an alert for every detected opportunity.
    #[serde(default = "default_true")]
    pub alerts_enabled: bool,

    /// Webhook receiving alert payloads.
    #[serde(default)]
    pub alert_webhook_url: Option<String>,

    // === Server Configuration ===
    /// HTTP server port for the dashboard API.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,

    /// Expose Prometheus metrics on `/metrics`.
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_sport() -> String {
    "soccer_epl".to_string()
}

fn default_regions() -> String {
    "uk,us".to_string()
}

fn default_markets() -> String {
    "h2h".to_string()
}

fn default_odds_api_url() -> String {
    "https://api.the-odds-api.com".to_string()
}

fn default_http_timeout_ms() -> u64 {
    10_000
}

fn default_poll_interval() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Build a configuration with defaults for everything but the API key.
    pub fn with_api_key(odds_api_key: impl Into<String>) -> Self {
        Self {
            odds_api_key: odds_api_key.into(),
            sport: default_sport(),
            regions: default_regions(),
            markets: default_markets(),
            odds_format: OddsFormat::default(),
            odds_api_url: default_odds_api_url(),
            http_timeout_ms: default_http_timeout_ms(),
            poll_interval_secs: default_poll_interval(),
            alerts_enabled: true,
            alert_webhook_url: None,
            port: default_port(),
            rust_log: default_log_level(),
            verbose: false,
            metrics_enabled: true,
        }
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.odds_api_key.trim().is_empty() {
            return Err("ODDS_API_KEY is required".to_string());
        }

        if self.sport.trim().is_empty() {
            return Err("SPORT must not be empty".to_string());
        }

        if self.odds_format != OddsFormat::Decimal {
            return Err(format!(
                "ODDS_FORMAT must be decimal, got {}",
                self.odds_format
            ));
        }

        Url::parse(&self.odds_api_url)
            .map_err(|e| format!("ODDS_API_URL is not a valid URL: {}", e))?;

        if let Some(webhook) = &self.alert_webhook_url {
            Url::parse(webhook)
                .map_err(|e| format!("ALERT_WEBHOOK_URL is not a valid URL: {}", e))?;
        }

        if self.poll_interval_secs == 0 {
            return Err("POLL_INTERVAL_SECS must be at least 1".to_string());
        }

        Ok(())
    }

    /// Whether alerts can actually be dispatched.
    pub fn alerts_active(&self) -> bool {
        self.alerts_enabled && self.alert_webhook_url.is_some()
    }
}
