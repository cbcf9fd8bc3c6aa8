//! HTTP API module for health, metrics, and dashboard endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, DashboardSink};
pub use routes::create_router;
