// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{routing::get, Router};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::battery_service::BatteryService;
use crate::application::dashboard_service::DashboardService;
use crate::application::monitor::BatteryMonitor;
use crate::application::streaming_service::StreamingDashboardService;
use crate::application::telemetry_source::TelemetrySource;
use crate::infrastructure::config::{load_layout, load_settings};
use crate::infrastructure::simulator::SimulatedBattery;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    battery_forecast, battery_history, charging_advice, current_battery, get_dashboard,
    health_check, list_alerts, live_dashboard, stream_dashboard,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let settings = load_settings()?;
    let layout = load_layout()?;

    // Create the telemetry source (infrastructure layer)
    let source: Arc<dyn TelemetrySource> = Arc::new(SimulatedBattery::new());

    // Seed the initial frame and start the refresh loop
    let (monitor, frame_rx) = BatteryMonitor::new(
        source.clone(),
        settings.thresholds,
        settings.alert_capacity,
        Duration::from_secs(settings.refresh_secs),
    )
    .await?;

    let cancel = CancellationToken::new();
    monitor.start(cancel.clone());

    // Create services (application layer)
    let battery_service = BatteryService::new(source, frame_rx);
    let dashboard_service = DashboardService::new(battery_service.clone(), layout.clone());
    let streaming_service = StreamingDashboardService::new(battery_service.clone(), layout);

    // Create application state
    let state = Arc::new(AppState {
        battery_service,
        dashboard_service,
        streaming_service,
    });

    // Build router (presentation layer)
    // Note: We handle compression manually in our response builders,
    // so we don't use CompressionLayer to avoid double compression/decompression
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/battery", get(current_battery))
        .route("/battery/history", get(battery_history))
        .route("/battery/forecast", get(battery_forecast))
        .route("/battery/advice", get(charging_advice))
        .route("/alerts", get(list_alerts))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/stream", get(stream_dashboard))
        .route("/dashboard/live", get(live_dashboard))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    tracing::info!("starting ev-battery-telemetry service on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let shutdown_cancel = cancel.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("received Ctrl+C, initiating shutdown");
            shutdown_cancel.cancel();
        })
        .await?;

    cancel.cancel();
    Ok(())
}
