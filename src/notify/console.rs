//! Sinks that render to the terminal or the log.

use async_trait::async_trait;
use tracing::info;

use super::format::dashboard_lines;
use super::NotificationSink;
use crate::arbitrage::Opportunity;

/// Prints the dashboard block to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleSink;

#[async_trait]
impl NotificationSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn publish(&self, opportunities: &[Opportunity]) {
        for line in dashboard_lines(opportunities) {
            println!("{}", line);
        }
    }
}

/// Emits one structured log event per opportunity.
#[derive(Debug, Clone, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn publish(&self, opportunities: &[Opportunity]) {
        for opp in opportunities {
            info!(
                event = %opp.label(),
                bookmaker_a = %opp.bookmaker_a,
                bookmaker_b = %opp.bookmaker_b,
                price_a = %opp.price_a,
                price_b = %opp.price_b,
                margin_pct = %opp.profit_margin_percent,
                "Arbitrage opportunity detected"
            );
        }
    }
}
