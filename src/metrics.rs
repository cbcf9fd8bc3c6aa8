//! Prometheus metrics for scan cycles and alerting.
//!
//! This module provides metrics for:
//! - Odds fetch latency and failures
//! - Detection latency and results
//! - Skipped records
//! - Alert delivery

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::arbitrage::DetectionSummary;

// === Metric Name Constants ===

/// Odds fetch latency metric name.
pub const METRIC_FETCH_LATENCY: &str = "odds_fetch_latency_ms";
/// Detection latency metric name.
pub const METRIC_DETECTION_LATENCY: &str = "opportunity_detection_latency_ms";
/// Scan cycles counter metric name.
pub const METRIC_CYCLES: &str = "scan_cycles_total";
/// Failed fetches counter metric name.
pub const METRIC_FETCH_FAILURES: &str = "odds_fetch_failures_total";
/// Opportunities detected counter metric name.
pub const METRIC_OPPORTUNITIES_DETECTED: &str = "opportunities_detected_total";
/// Skipped matches counter metric name.
pub const METRIC_MATCHES_SKIPPED: &str = "matches_skipped_total";
/// Skipped pairs counter metric name.
pub const METRIC_PAIRS_SKIPPED: &str = "pairs_skipped_total";
/// Alerts sent counter metric name.
pub const METRIC_ALERTS_SENT: &str = "alerts_sent_total";
/// Alerts failed counter metric name.
pub const METRIC_ALERTS_FAILED: &str = "alerts_failed_total";

/// Install the Prometheus recorder and register metric descriptions.
///
/// Call this once at startup; the handle renders the `/metrics` body.
pub fn install_recorder() -> Result<PrometheusHandle, String> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("failed to install metrics recorder: {}", e))?;
    init_metrics();
    Ok(handle)
}

/// Initialize all metric descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_FETCH_LATENCY,
        "Odds feed request latency in milliseconds"
    );
    describe_histogram!(
        METRIC_DETECTION_LATENCY,
        "Time to scan a snapshot in milliseconds"
    );

    describe_counter!(METRIC_CYCLES, "Total number of scan cycles");
    describe_counter!(
        METRIC_FETCH_FAILURES,
        "Total number of failed odds fetches"
    );
    describe_counter!(
        METRIC_OPPORTUNITIES_DETECTED,
        "Total number of arbitrage opportunities detected"
    );
    describe_counter!(
        METRIC_MATCHES_SKIPPED,
        "Total number of matches skipped for missing or malformed quotes"
    );
    describe_counter!(
        METRIC_PAIRS_SKIPPED,
        "Total number of bookmaker pairs skipped for invalid prices"
    );
    describe_counter!(METRIC_ALERTS_SENT, "Total number of alerts delivered");
    describe_counter!(METRIC_ALERTS_FAILED, "Total number of alerts that failed");

    debug!("Metrics initialized");
}

/// Record odds fetch latency.
pub fn record_fetch_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_FETCH_LATENCY).record(latency_ms);
}

/// Increment scan cycles counter.
pub fn inc_cycles() {
    counter!(METRIC_CYCLES).increment(1);
}

/// Increment failed fetches counter.
pub fn inc_fetch_failures(kind: &'static str) {
    counter!(METRIC_FETCH_FAILURES, "kind" => kind).increment(1);
}

/// Record the outcome of a detection pass.
pub fn record_detection(summary: &DetectionSummary) {
    counter!(METRIC_OPPORTUNITIES_DETECTED).increment(summary.opportunities.len() as u64);
    counter!(METRIC_MATCHES_SKIPPED).increment(summary.matches_skipped as u64);
    counter!(METRIC_PAIRS_SKIPPED).increment(summary.pairs_skipped as u64);
}

/// Increment alerts sent counter.
pub fn inc_alerts_sent() {
    counter!(METRIC_ALERTS_SENT).increment(1);
}

/// Increment alerts failed counter.
pub fn inc_alerts_failed() {
    counter!(METRIC_ALERTS_FAILED).increment(1);
}

/// RAII guard for timing operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    metric_name: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given metric.
    pub fn new(metric_name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            metric_name,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(self.metric_name).record(self.elapsed_ms());
    }
}

/// Create a latency timer for detection.
pub fn timer_detection() -> LatencyTimer {
    LatencyTimer::new(METRIC_DETECTION_LATENCY)
}
