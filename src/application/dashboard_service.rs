// Dashboard service - Use case for building dashboards from the layout
use crate::application::battery_service::BatteryService;
use crate::domain::battery::BatterySnapshot;
use crate::domain::dashboard::{ChartData, Dashboard, SeriesData, SeriesPoint, TileData};
use crate::domain::telemetry::{ForecastPoint, HistoricalPoint, TimeRange};
use crate::infrastructure::config::{
    ChartLayout, ChartSource, LayoutConfig, MetricKind, SeriesField, TileLayout,
};

#[derive(Clone)]
pub struct DashboardService {
    battery: BatteryService,
    layout: LayoutConfig,
}

impl DashboardService {
    pub fn new(battery: BatteryService, layout: LayoutConfig) -> Self {
        Self { battery, layout }
    }

    /// Assemble the full dashboard: tiles from the current frame, charts
    /// from their configured sources.
    pub async fn get_dashboard(&self, range: TimeRange) -> anyhow::Result<Dashboard> {
        let frame = self.battery.current_frame();

        let tiles = self
            .layout
            .tiles
            .iter()
            .map(|t| bind_tile(t, &frame.snapshot))
            .collect();

        let mut charts = Vec::with_capacity(self.layout.charts.len());
        for chart_layout in &self.layout.charts {
            charts.push(bind_chart(&self.battery, chart_layout, range, &frame.snapshot).await?);
        }

        Ok(Dashboard::new(self.layout.title.clone(), tiles, charts))
    }
}

/// Resolve one tile against the snapshot.
pub(crate) fn bind_tile(layout: &TileLayout, snapshot: &BatterySnapshot) -> TileData {
    let (value, status) = match layout.metric {
        MetricKind::ChargeLevel => (
            snapshot.charge_level as f64,
            Some(snapshot.charge_status().to_string()),
        ),
        MetricKind::Temperature => (
            snapshot.temperature as f64,
            Some(snapshot.temperature_status().to_string()),
        ),
        MetricKind::Voltage => (
            snapshot.voltage as f64,
            Some(BatterySnapshot::VOLTAGE_CAPTION.to_string()),
        ),
        MetricKind::Health => (
            snapshot.health as f64,
            Some(snapshot.health_status().to_string()),
        ),
    };

    TileData::new(
        layout.id.clone(),
        layout.title.clone(),
        layout.unit.clone(),
        value,
        layout.precision,
        status,
    )
}

/// Resolve one chart against its configured source. History and forecast
/// series are regenerated per call; cell series read the given snapshot.
pub(crate) async fn bind_chart(
    battery: &BatteryService,
    layout: &ChartLayout,
    range: TimeRange,
    snapshot: &BatterySnapshot,
) -> anyhow::Result<ChartData> {
    let series = match layout.source {
        ChartSource::History => {
            let points = battery.history(range).await?;
            layout
                .series
                .iter()
                .map(|s| {
                    let series_points = points
                        .iter()
                        .filter_map(|p| {
                            history_value(s.field, p).map(|value| SeriesPoint {
                                label: p.time.clone(),
                                value,
                            })
                        })
                        .collect();
                    SeriesData::new(s.id.clone(), s.name.clone(), s.color.clone(), series_points)
                })
                .collect()
        }
        ChartSource::Cells => layout
            .series
            .iter()
            .map(|s| {
                let series_points = snapshot
                    .cells
                    .iter()
                    .map(|cell| SeriesPoint {
                        label: cell.id.clone(),
                        value: cell.voltage,
                    })
                    .collect();
                SeriesData::new(s.id.clone(), s.name.clone(), s.color.clone(), series_points)
            })
            .collect(),
        ChartSource::Forecast => {
            let points = battery.forecast().await?;
            layout
                .series
                .iter()
                .map(|s| {
                    let series_points = points
                        .iter()
                        .filter_map(|p| {
                            forecast_value(s.field, p).map(|value| SeriesPoint {
                                label: p.month.clone(),
                                value,
                            })
                        })
                        .collect();
                    SeriesData::new(s.id.clone(), s.name.clone(), s.color.clone(), series_points)
                })
                .collect()
        }
    };

    Ok(ChartData {
        id: layout.id.clone(),
        title: layout.title.clone(),
        unit: layout.unit.clone(),
        kind: layout.kind,
        y_min: layout.y_min,
        y_max: layout.y_max,
        fraction_digits: layout.fraction_digits,
        reference_line: layout.reference_line.clone(),
        series,
    })
}

fn history_value(field: SeriesField, point: &HistoricalPoint) -> Option<f64> {
    match field {
        SeriesField::ChargeLevel => Some(point.charge_level as f64),
        SeriesField::Temperature => Some(point.temperature as f64),
        SeriesField::Voltage => Some(point.voltage as f64),
        _ => None,
    }
}

fn forecast_value(field: SeriesField, point: &ForecastPoint) -> Option<f64> {
    match field {
        SeriesField::PredictedHealth => Some(point.predicted_health as f64),
        SeriesField::ActualHealth => point.actual_health.map(|v| v as f64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;
    use tokio::sync::watch;

    use crate::domain::battery::BatteryCell;
    use crate::domain::telemetry::TelemetryFrame;
    use crate::infrastructure::simulator::SimulatedBattery;

    fn fixed_snapshot() -> BatterySnapshot {
        let cells = (1..=10)
            .map(|n| BatteryCell {
                id: format!("Cell {n}"),
                voltage: 3.7,
                temperature: 42.0,
                health: 85.0,
            })
            .collect();

        BatterySnapshot {
            charge_level: 15,
            temperature: 42,
            voltage: 405,
            health: 85,
            charging: true,
            cells,
            last_updated: Utc::now(),
        }
    }

    fn service() -> DashboardService {
        let frame = TelemetryFrame {
            snapshot: fixed_snapshot(),
            alerts: Vec::new(),
        };
        let (_tx, rx) = watch::channel(frame);
        // The sender is dropped, but borrow() keeps returning the seeded frame.
        let battery = BatteryService::new(Arc::new(SimulatedBattery::new()), rx);
        let layout = crate::infrastructure::config::load_layout().unwrap();
        DashboardService::new(battery, layout)
    }

    #[tokio::test]
    async fn test_tiles_mirror_the_snapshot() {
        let dashboard = service().get_dashboard(TimeRange::Week).await.unwrap();

        assert_eq!(dashboard.title, "EV Battery Management System");
        assert_eq!(dashboard.tiles.len(), 4);

        let charge = &dashboard.tiles[0];
        assert_eq!(charge.value, 15.0);
        assert_eq!(charge.status.as_deref(), Some("Currently charging"));

        let temperature = &dashboard.tiles[1];
        assert_eq!(temperature.value, 42.0);
        assert_eq!(temperature.status.as_deref(), Some("High temperature"));

        let voltage = &dashboard.tiles[2];
        assert_eq!(voltage.value, 405.0);
        assert_eq!(voltage.status.as_deref(), Some("Nominal range: 350V - 420V"));

        let health = &dashboard.tiles[3];
        assert_eq!(health.value, 85.0);
        assert_eq!(health.status.as_deref(), Some("Excellent condition"));
    }

    #[tokio::test]
    async fn test_charts_bind_their_sources() {
        let dashboard = service().get_dashboard(TimeRange::Week).await.unwrap();
        assert_eq!(dashboard.charts.len(), 4);

        let performance = &dashboard.charts[0];
        assert_eq!(performance.series.len(), 3);
        for series in &performance.series {
            assert_eq!(series.points.len(), 7);
            assert_eq!(series.points[0].label, "Sun");
        }

        let cells = dashboard.charts.iter().find(|c| c.id == "cellBalance").unwrap();
        assert_eq!(cells.series.len(), 1);
        assert_eq!(cells.series[0].points.len(), 10);
        assert_eq!(cells.series[0].points[0].label, "Cell 1");
        assert_eq!(cells.series[0].points[0].value, 3.7);

        let forecast = dashboard.charts.iter().find(|c| c.id == "healthForecast").unwrap();
        let predicted = forecast.series.iter().find(|s| s.id == "predictedHealth").unwrap();
        let actual = forecast.series.iter().find(|s| s.id == "actualHealth").unwrap();
        assert_eq!(predicted.points.len(), 12);
        assert_eq!(actual.points.len(), 6);
        assert_eq!(forecast.reference_line.as_ref().unwrap().value, 70.0);
    }
}
