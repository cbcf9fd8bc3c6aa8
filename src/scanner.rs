//! Fetch, detect, publish.

use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tracing::{info, instrument, warn};

use crate::arbitrage::detect_with_summary;
use crate::error::SourceError;
use crate::metrics;
use crate::notify::NotificationSink;
use crate::odds::OddsSource;

/// What one cycle did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleReport {
    /// Whether the source produced a snapshot.
    pub fetched: bool,
    /// Matches in the snapshot.
    pub matches: usize,
    /// Matches skipped by the detector.
    pub matches_skipped: usize,
    /// Opportunities published.
    pub opportunities: usize,
}

/// Run one fetch/detect/publish cycle.
///
/// A source failure is logged and published as an empty cycle.
#[instrument(skip(source, sink))]
pub async fn run_cycle(source: &dyn OddsSource, sink: &dyn NotificationSink) -> CycleReport {
    metrics::inc_cycles();

    let snapshot = match source.fetch().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            metrics::inc_fetch_failures(match &e {
                SourceError::SourceUnavailable(_) => "unavailable",
                SourceError::MalformedResponse(_) => "malformed",
            });
            warn!(error = %e, "Odds fetch failed, treating cycle as empty");
            sink.publish(&[]).await;
            return CycleReport::default();
        }
    };

    let summary = {
        let _timer = metrics::timer_detection();
        detect_with_summary(&snapshot)
    };
    metrics::record_detection(&summary);

    info!(
        sport = %snapshot.sport,
        matches = snapshot.len(),
        skipped = summary.matches_skipped,
        found = summary.opportunities.len(),
        "Scan complete"
    );

    sink.publish(&summary.opportunities).await;

    CycleReport {
        fetched: true,
        matches: snapshot.len(),
        matches_skipped: summary.matches_skipped,
        opportunities: summary.opportunities.len(),
    }
}

/// Run cycles every `interval` until `shutdown` resolves.
///
/// The first cycle starts immediately. Returns the number of cycles run.
pub async fn run_loop<F>(
    source: &dyn OddsSource,
    sink: &dyn NotificationSink,
    interval: Duration,
    shutdown: F,
) -> u64
where
    F: Future<Output = ()>,
{
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    let mut cycles = 0u64;

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!(cycles, "Scanner stopping");
                return cycles;
            }
            _ = ticker.tick() => {
                run_cycle(source, sink).await;
                cycles += 1;
            }
        }
    }
}
