// Battery service - read-side facade over the source and the monitor feed
use std::sync::Arc;

use tokio::sync::watch;

use crate::application::telemetry_source::TelemetrySource;
use crate::domain::alert::Alert;
use crate::domain::insights::{ChargingAdvice, HealthOutlook};
use crate::domain::telemetry::{ForecastPoint, HistoricalPoint, TelemetryFrame, TimeRange};

#[derive(Clone)]
pub struct BatteryService {
    source: Arc<dyn TelemetrySource>,
    frame_rx: watch::Receiver<TelemetryFrame>,
}

impl BatteryService {
    pub fn new(source: Arc<dyn TelemetrySource>, frame_rx: watch::Receiver<TelemetryFrame>) -> Self {
        Self { source, frame_rx }
    }

    /// The latest frame broadcast by the monitor.
    pub fn current_frame(&self) -> TelemetryFrame {
        self.frame_rx.borrow().clone()
    }

    /// Current alert log contents, newest first.
    pub fn alerts(&self) -> Vec<Alert> {
        self.frame_rx.borrow().alerts.clone()
    }

    /// Fresh historical series for the requested range.
    pub async fn history(&self, range: TimeRange) -> anyhow::Result<Vec<HistoricalPoint>> {
        self.source.history(range).await
    }

    /// Fresh twelve-month health forecast.
    pub async fn forecast(&self) -> anyhow::Result<Vec<ForecastPoint>> {
        self.source.forecast().await
    }

    pub fn outlook(&self) -> HealthOutlook {
        HealthOutlook::derive(&self.frame_rx.borrow().snapshot)
    }

    pub fn advice(&self) -> ChargingAdvice {
        ChargingAdvice::derive(&self.frame_rx.borrow().snapshot)
    }

    /// Subscribe to the monitor's frame broadcasts.
    pub fn subscribe(&self) -> watch::Receiver<TelemetryFrame> {
        self.frame_rx.clone()
    }
}
