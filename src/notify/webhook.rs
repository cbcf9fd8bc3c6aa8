//! Alert delivery over an HTTP webhook.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use super::format::{alert_body, alert_subject};
use super::NotificationSink;
use crate::arbitrage::Opportunity;
use crate::error::NotifyError;
use crate::metrics;

/// JSON payload posted for each opportunity.
#[derive(Debug, Clone, Serialize)]
pub struct AlertPayload<'a> {
    /// Alert subject line.
    pub subject: String,
    /// Plain-text alert body.
    pub body: String,
    /// The opportunity itself.
    pub opportunity: &'a Opportunity,
}

impl<'a> AlertPayload<'a> {
    /// Build the payload for an opportunity.
    pub fn new(opportunity: &'a Opportunity) -> Self {
        Self {
            subject: alert_subject(opportunity),
            body: alert_body(opportunity),
            opportunity,
        }
    }
}

/// Posts one alert per opportunity to a webhook.
#[derive(Debug, Clone)]
pub struct WebhookSink {
    http: reqwest::Client,
    url: String,
}

impl WebhookSink {
    /// Create a sink posting to `url`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            url: url.into(),
        })
    }

    /// Webhook URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Deliver a single alert.
    #[instrument(skip(self, opportunity), fields(event = %opportunity.label()))]
    pub async fn send_alert(&self, opportunity: &Opportunity) -> Result<(), NotifyError> {
        let response = self
            .http
            .post(&self.url)
            .json(&AlertPayload::new(opportunity))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(NotifyError::Rejected {
                status: response.status().as_u16(),
            });
        }

        debug!("Alert sent");
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn publish(&self, opportunities: &[Opportunity]) {
        for opp in opportunities {
            match self.send_alert(opp).await {
                Ok(()) => metrics::inc_alerts_sent(),
                Err(e) => {
                    metrics::inc_alerts_failed();
                    warn!(event = %opp.label(), error = %e, "Alert failed");
                }
            }
        }
    }
}
