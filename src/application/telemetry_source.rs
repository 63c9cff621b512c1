// Source trait for battery telemetry
use async_trait::async_trait;

use crate::domain::battery::BatterySnapshot;
use crate::domain::telemetry::{ForecastPoint, HistoricalPoint, TimeRange};

/// Where telemetry comes from. The simulator implements this today; a real
/// BMS feed would plug in here.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// Sample the current battery state.
    async fn sample(&self) -> anyhow::Result<BatterySnapshot>;

    /// Historical series for the requested range. Every call yields a fresh
    /// sequence; nothing persists between calls.
    async fn history(&self, range: TimeRange) -> anyhow::Result<Vec<HistoricalPoint>>;

    /// Twelve-month health forecast.
    async fn forecast(&self) -> anyhow::Result<Vec<ForecastPoint>>;
}
