// HTTP request handlers
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::domain::insights::HealthOutlook;
use crate::domain::telemetry::{ForecastPoint, HistoricalPoint, TimeRange};
use crate::infrastructure::event_stream::{sse_stream, stream_from_receiver};
use crate::infrastructure::http_response::json_response;
use crate::presentation::app_state::AppState;

#[derive(Deserialize)]
pub struct RangeQuery {
    pub range: Option<String>,
}

impl RangeQuery {
    /// Missing or unrecognized selectors resolve to the 24-hour view.
    fn resolve(&self) -> TimeRange {
        TimeRange::parse(self.range.as_deref().unwrap_or("24h"))
    }
}

/// Check if the client accepts Brotli compression
fn accepts_brotli(headers: &HeaderMap) -> bool {
    headers
        .get("accept-encoding")
        .and_then(|v| v.to_str().ok())
        .map(|s| s.contains("br"))
        .unwrap_or(false)
}

async fn json_or_error<T: Serialize>(data: &T, compress: bool) -> Response {
    match json_response(data, compress).await {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Current telemetry frame: the latest snapshot plus the alert log
pub async fn current_battery(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let frame = state.battery_service.current_frame();
    json_or_error(&frame, accepts_brotli(&headers)).await
}

#[derive(Serialize)]
struct HistoryResponse {
    range: TimeRange,
    points: Vec<HistoricalPoint>,
}

/// Historical series for the requested range. The echoed range is the
/// resolved one, making the default fallback visible to the client.
pub async fn battery_history(
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let range = query.resolve();

    match state.battery_service.history(range).await {
        Ok(points) => {
            json_or_error(&HistoryResponse { range, points }, accepts_brotli(&headers)).await
        }
        Err(e) => {
            tracing::error!("history generation failed: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[derive(Serialize)]
struct ForecastResponse {
    outlook: HealthOutlook,
    points: Vec<ForecastPoint>,
}

/// Twelve-month health forecast plus the derived outlook
pub async fn battery_forecast(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.battery_service.forecast().await {
        Ok(points) => {
            let outlook = state.battery_service.outlook();
            json_or_error(&ForecastResponse { outlook, points }, accepts_brotli(&headers)).await
        }
        Err(e) => {
            tracing::error!("forecast generation failed: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Charging recommendations derived from the current snapshot
pub async fn charging_advice(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    let advice = state.battery_service.advice();
    json_or_error(&advice, accepts_brotli(&headers)).await
}

/// Current alert log, newest first
pub async fn list_alerts(headers: HeaderMap, State(state): State<Arc<AppState>>) -> Response {
    let alerts = state.battery_service.alerts();
    json_or_error(&alerts, accepts_brotli(&headers)).await
}

/// Fully assembled dashboard in one response
pub async fn get_dashboard(
    Query(query): Query<RangeQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Response {
    match state.dashboard_service.get_dashboard(query.resolve()).await {
        Ok(dashboard) => json_or_error(&dashboard, accepts_brotli(&headers)).await,
        Err(e) => {
            tracing::error!("dashboard assembly failed: {e:#}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Stream the dashboard progressively (skeleton, widgets, completion)
pub async fn stream_dashboard(
    Query(query): Query<RangeQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let rx = state.streaming_service.stream_dashboard(query.resolve()).await;
    stream_from_receiver(rx).into_response()
}

/// Continuous feed of telemetry frames, one per refresh tick
pub async fn live_dashboard(State(state): State<Arc<AppState>>) -> Response {
    match sse_stream(state.streaming_service.live_frames()) {
        Ok(response) => response,
        Err(status) => status.into_response(),
    }
}
