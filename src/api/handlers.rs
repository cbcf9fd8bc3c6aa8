//! HTTP API handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use crate::arbitrage::{sort_by_margin, Opportunity};
use crate::notify::NotificationSink;

/// Latest cycle as seen by the dashboard.
#[derive(Debug, Clone, Default)]
pub struct CycleState {
    /// Cycles published so far.
    pub cycles: u64,
    /// Opportunities published across all cycles.
    pub total_opportunities: u64,
    /// When the last cycle was published.
    pub last_scan: Option<OffsetDateTime>,
    /// Opportunities of the last cycle, in detection order.
    pub opportunities: Vec<Opportunity>,
}

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Sport key being scanned.
    pub sport: String,
    /// Whether at least one cycle has completed.
    pub ready: Arc<AtomicBool>,
    /// Latest cycle.
    pub cycle: Arc<RwLock<CycleState>>,
    /// Prometheus handle, when metrics are enabled.
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(sport: impl Into<String>) -> Self {
        Self {
            sport: sport.into(),
            ready: Arc::new(AtomicBool::new(false)),
            cycle: Arc::new(RwLock::new(CycleState::default())),
            metrics: None,
        }
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics = Some(handle);
        self
    }

    /// Set ready state.
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    /// Check if ready.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Store a published cycle.
    pub async fn record_cycle(&self, opportunities: &[Opportunity]) {
        let mut cycle = self.cycle.write().await;
        cycle.cycles += 1;
        cycle.total_opportunities += opportunities.len() as u64;
        cycle.last_scan = Some(OffsetDateTime::now_utc());
        cycle.opportunities = opportunities.to_vec();
        drop(cycle);

        self.set_ready(true);
    }
}

/// Sink feeding the dashboard endpoints.
#[derive(Clone)]
pub struct DashboardSink {
    state: AppState,
}

impl DashboardSink {
    /// Create a sink writing into `state`.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl NotificationSink for DashboardSink {
    fn name(&self) -> &str {
        "dashboard"
    }

    async fn publish(&self, opportunities: &[Opportunity]) {
        self.state.record_cycle(opportunities).await;
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
}

/// Readiness check response.
#[derive(Debug, Serialize)]
pub struct ReadyResponse {
    /// Whether a cycle has completed.
    pub ready: bool,
    /// Sport being scanned.
    pub sport: String,
}

/// Status response.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    /// Service status.
    pub status: &'static str,
    /// Sport being scanned.
    pub sport: String,
    /// Cycles published.
    pub cycles: u64,
    /// Opportunities published across all cycles.
    pub total_opportunities: u64,
    /// Opportunities in the last cycle.
    pub current_opportunities: usize,
    /// Last cycle time (RFC 3339).
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_scan: Option<OffsetDateTime>,
}

/// Opportunities response.
#[derive(Debug, Serialize)]
pub struct OpportunitiesResponse {
    /// Number of opportunities.
    pub count: usize,
    /// Opportunities, best margin first.
    pub opportunities: Vec<Opportunity>,
}

/// Health check handler - always returns 200.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

/// Readiness check handler - returns 200 once a cycle completed, 503 otherwise.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let is_ready = state.is_ready();
    let response = ReadyResponse {
        ready: is_ready,
        sport: state.sport.clone(),
    };

    if is_ready {
        (StatusCode::OK, Json(response))
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(response))
    }
}

/// Status handler - returns cycle counters.
pub async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let cycle = state.cycle.read().await;
    let status = if state.is_ready() { "running" } else { "starting" };

    Json(StatusResponse {
        status,
        sport: state.sport.clone(),
        cycles: cycle.cycles,
        total_opportunities: cycle.total_opportunities,
        current_opportunities: cycle.opportunities.len(),
        last_scan: cycle.last_scan,
    })
}

/// Opportunities handler - latest cycle, best margin first.
pub async fn opportunities(State(state): State<AppState>) -> impl IntoResponse {
    let mut opportunities = state.cycle.read().await.opportunities.clone();
    sort_by_margin(&mut opportunities);

    Json(OpportunitiesResponse {
        count: opportunities.len(),
        opportunities,
    })
}

/// Prometheus exposition handler.
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    match &state.metrics {
        Some(handle) => (StatusCode::OK, handle.render()),
        None => (StatusCode::NOT_FOUND, "metrics disabled".to_string()),
    }
}
