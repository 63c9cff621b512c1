// Configuration loading - service settings and the dashboard layout
use serde::Deserialize;
use thiserror::Error;

use crate::domain::alert::Thresholds;
use crate::domain::dashboard::{ChartKind, ReferenceLine};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),
    #[error("failed to read layout: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse layout: {0}")]
    Layout(#[from] toml::de::Error),
    #[error("chart '{chart}': series '{series}' binds field {field:?}, which source {chart_source:?} cannot provide")]
    SeriesBinding {
        chart: String,
        series: String,
        chart_source: ChartSource,
        field: SeriesField,
    },
    #[error("refresh interval must be at least 1 second")]
    RefreshTooShort,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub refresh_secs: u64,
    pub thresholds: Thresholds,
    pub alert_capacity: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            refresh_secs: 5,
            thresholds: Thresholds::default(),
            alert_capacity: 5,
        }
    }
}

/// Load service settings from `config/telemetry.toml` if present; the
/// defaults reproduce the documented behavior with no file at all.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/telemetry").required(false))
        .build()?;
    let settings: Settings = settings.try_deserialize()?;

    if settings.refresh_secs < 1 {
        return Err(ConfigError::RefreshTooShort);
    }
    Ok(settings)
}

/// Which snapshot metric a tile displays.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum MetricKind {
    ChargeLevel,
    Temperature,
    Voltage,
    Health,
}

/// Where a chart's series data comes from. History and forecast series are
/// regenerated on every request; cell series read the current frame.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ChartSource {
    History,
    Cells,
    Forecast,
}

/// Which field of the source a series plots.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SeriesField {
    ChargeLevel,
    Temperature,
    Voltage,
    CellVoltage,
    PredictedHealth,
    ActualHealth,
}

impl SeriesField {
    fn valid_for(self, source: ChartSource) -> bool {
        matches!(
            (source, self),
            (
                ChartSource::History,
                SeriesField::ChargeLevel | SeriesField::Temperature | SeriesField::Voltage
            ) | (ChartSource::Cells, SeriesField::CellVoltage)
                | (
                    ChartSource::Forecast,
                    SeriesField::PredictedHealth | SeriesField::ActualHealth
                )
        )
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TileLayout {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
    pub metric: MetricKind,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeriesLayout {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub field: SeriesField,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartLayout {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub source: ChartSource,
    pub y_min: Option<f64>,
    pub y_max: Option<f64>,
    pub fraction_digits: Option<i32>,
    pub reference_line: Option<ReferenceLine>,
    #[serde(default)]
    pub series: Vec<SeriesLayout>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    pub title: String,
    #[serde(default)]
    pub tiles: Vec<TileLayout>,
    #[serde(default)]
    pub charts: Vec<ChartLayout>,
}

impl LayoutConfig {
    /// Reject impossible source/field bindings at load time so they never
    /// surface at request time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for chart in &self.charts {
            for series in &chart.series {
                if !series.field.valid_for(chart.source) {
                    return Err(ConfigError::SeriesBinding {
                        chart: chart.id.clone(),
                        series: series.id.clone(),
                        chart_source: chart.source,
                        field: series.field,
                    });
                }
            }
        }
        Ok(())
    }
}

/// The default dashboard: four snapshot tiles, the multi-line performance
/// chart, the charge-cycles area chart, the cell-balance bar chart, and the
/// health forecast with its critical line.
const DEFAULT_LAYOUT: &str = r##"
title = "EV Battery Management System"

[[tiles]]
id = "charge"
title = "Battery Charge"
unit = "%"
precision = 0
metric = "chargeLevel"

[[tiles]]
id = "temperature"
title = "Temperature"
unit = "°C"
precision = 0
metric = "temperature"

[[tiles]]
id = "voltage"
title = "Voltage"
unit = "V"
precision = 0
metric = "voltage"

[[tiles]]
id = "health"
title = "Health"
unit = "%"
precision = 0
metric = "health"

[[charts]]
id = "performance"
title = "Battery Performance"
kind = "multiLine"
source = "history"

[[charts.series]]
id = "chargeLevel"
name = "Charge Level"
color = "#22c55e"
field = "chargeLevel"

[[charts.series]]
id = "temperature"
name = "Temperature"
color = "#f97316"
field = "temperature"

[[charts.series]]
id = "voltage"
name = "Voltage"
color = "#3b82f6"
field = "voltage"

[[charts]]
id = "chargeCycles"
title = "Charge Cycles"
unit = "%"
kind = "area"
source = "history"
y_min = 0.0
y_max = 100.0

[[charts.series]]
id = "charge"
name = "Charge Level"
field = "chargeLevel"

[[charts]]
id = "cellBalance"
title = "Cell Balance"
unit = "V"
kind = "bar"
source = "cells"
y_min = 3.0
y_max = 4.2
fraction_digits = 2

[[charts.series]]
id = "cellVoltage"
name = "Cell Voltage"
field = "cellVoltage"

[[charts]]
id = "healthForecast"
title = "Health Forecast"
unit = "%"
kind = "area"
source = "forecast"

[charts.reference_line]
value = 70.0
label = "Critical"

[[charts.series]]
id = "predictedHealth"
name = "Predicted Health"
field = "predictedHealth"

[[charts.series]]
id = "actualHealth"
name = "Actual Health"
field = "actualHealth"
"##;

/// Load the dashboard layout from `config/layout.toml`, falling back to the
/// embedded default when the file does not exist.
pub fn load_layout() -> Result<LayoutConfig, ConfigError> {
    let text = match std::fs::read_to_string("config/layout.toml") {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => DEFAULT_LAYOUT.to_string(),
        Err(e) => return Err(e.into()),
    };

    let layout: LayoutConfig = toml::from_str(&text)?;
    layout.validate()?;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_parses_and_validates() {
        let layout: LayoutConfig = toml::from_str(DEFAULT_LAYOUT).unwrap();
        layout.validate().unwrap();

        assert_eq!(layout.title, "EV Battery Management System");
        assert_eq!(layout.tiles.len(), 4);
        assert_eq!(layout.charts.len(), 4);

        let forecast = layout.charts.iter().find(|c| c.id == "healthForecast").unwrap();
        assert_eq!(forecast.source, ChartSource::Forecast);
        assert_eq!(forecast.reference_line.as_ref().unwrap().label, "Critical");
        assert_eq!(forecast.series.len(), 2);
    }

    #[test]
    fn test_mismatched_series_binding_is_rejected() {
        let layout: LayoutConfig = toml::from_str(
            r#"
            title = "Test"

            [[charts]]
            id = "cells"
            title = "Cells"
            kind = "bar"
            source = "cells"

            [[charts.series]]
            id = "oops"
            name = "Oops"
            field = "predictedHealth"
            "#,
        )
        .unwrap();

        assert!(matches!(
            layout.validate(),
            Err(ConfigError::SeriesBinding { .. })
        ));
    }

    #[test]
    fn test_unknown_field_string_fails_to_parse() {
        let result: Result<LayoutConfig, _> = toml::from_str(
            r#"
            title = "Test"

            [[tiles]]
            id = "t"
            title = "T"
            unit = "%"
            precision = 0
            metric = "resistance"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_settings_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.refresh_secs, 5);
        assert_eq!(settings.alert_capacity, 5);
        assert_eq!(settings.thresholds.low_charge, 20);
        assert_eq!(settings.thresholds.high_temperature, 40);
        assert_eq!(settings.thresholds.high_voltage, 400);
    }

    #[test]
    fn test_settings_deserialize_with_partial_overrides() {
        let settings: Settings = toml::from_str(
            r#"
            refresh_secs = 2

            [thresholds]
            high_voltage = 390
            "#,
        )
        .unwrap();
        assert_eq!(settings.refresh_secs, 2);
        assert_eq!(settings.thresholds.high_voltage, 390);
        assert_eq!(settings.thresholds.low_charge, 20);
        assert_eq!(settings.alert_capacity, 5);
    }
}
