use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use crate::data::CheckRecord;
use crate::metrics::{monthly_metrics, newest_first, recent_pings as recent_window, MetricsSummary, RecentPing};
use crate::probe::{CycleSummary, ProbeCycle};
use crate::storage::{ResultStore, StoreError};

const RECENT_PINGS_ERROR: &str = "Couldn't fetch recent pings.";
const METRICS_ERROR: &str = "Couldn't fetch metrics.";
const UPTIME_DATA_ERROR: &str = "Couldn't fetch the uptime data.";
const PROBE_STORE_ERROR: &str = "Couldn't record the check.";

/// Application state shared across handlers
pub struct AppState {
    pub store: Arc<dyn ResultStore>,
    pub cycle: Arc<ProbeCycle>,
    /// Upper bound on a full store scan
    pub scan_timeout: Duration,
}

impl AppState {
    /// Read every record, bounded by the scan timeout
    async fn scan(&self) -> Result<Vec<CheckRecord>, StoreError> {
        match tokio::time::timeout(self.scan_timeout, self.store.scan_all()).await {
            Ok(result) => result,
            Err(_) => Err(StoreError::Timeout(self.scan_timeout.as_millis() as u64)),
        }
    }

    /// Scan, logging the failure detail and mapping it to a fixed message
    async fn scan_or(&self, message: &'static str) -> Result<Vec<CheckRecord>, ApiError> {
        self.scan().await.map_err(|e| {
            tracing::error!(
                store = %self.store.location(),
                error = %e,
                "Failed to scan check records"
            );
            ApiError::Internal(message)
        })
    }
}

// ============================================================================
// Health Check
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ============================================================================
// Read API
// ============================================================================

/// Checks from the last 30 minutes, newest first
pub async fn recent_pings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<RecentPing>>, ApiError> {
    let records = state.scan_or(RECENT_PINGS_ERROR).await?;
    Ok(Json(recent_window(records, Utc::now())))
}

/// Current calendar-month summary
pub async fn metrics(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MetricsSummary>, ApiError> {
    let records = state.scan_or(METRICS_ERROR).await?;
    Ok(Json(monthly_metrics(&records, Utc::now())))
}

/// Every stored check, newest first
pub async fn uptime_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CheckRecord>>, ApiError> {
    let records = state.scan_or(UPTIME_DATA_ERROR).await?;
    Ok(Json(newest_first(records)))
}

// ============================================================================
// On-demand probe
// ============================================================================

/// Run one probe cycle now
pub async fn trigger_probe(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CycleSummary>, ApiError> {
    let summary = state
        .cycle
        .try_run_once()
        .await
        .ok_or_else(|| ApiError::Conflict("A probe cycle is already running".to_string()))?;

    if summary.persist_error.is_some() {
        return Err(ApiError::Internal(PROBE_STORE_ERROR));
    }

    Ok(Json(summary))
}

// ============================================================================
// Error Handling
// ============================================================================

/// API errors. Internal errors carry only a fixed client-facing message; the
/// underlying cause is logged where it happens.
#[derive(Debug)]
pub enum ApiError {
    Conflict(String),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string()),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}
