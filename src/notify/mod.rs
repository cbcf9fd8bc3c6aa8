//! Notification module for detected opportunities.
//!
//! This module handles:
//! - The sink contract
//! - Console and log rendering
//! - Webhook alerts
//! - Fan-out to several sinks

pub mod console;
pub mod format;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;

use crate::arbitrage::Opportunity;

pub use console::{ConsoleSink, LogSink};
pub use webhook::WebhookSink;

/// Receives the opportunities of one cycle.
///
/// An empty slice means nothing was found this cycle. Implementations
/// handle their own delivery failures; `publish` never fails.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Consume one cycle's opportunities.
    async fn publish(&self, opportunities: &[Opportunity]);
}

/// Publishes to several sinks concurrently.
#[derive(Clone, Default)]
pub struct FanoutSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl FanoutSink {
    /// Create an empty fan-out.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sink.
    pub fn with(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Number of sinks.
    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    /// Whether no sinks are attached.
    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl NotificationSink for FanoutSink {
    fn name(&self) -> &str {
        "fanout"
    }

    async fn publish(&self, opportunities: &[Opportunity]) {
        join_all(self.sinks.iter().map(|sink| sink.publish(opportunities))).await;
    }
}
