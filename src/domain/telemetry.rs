// Telemetry data domain models
use serde::Serialize;

use super::alert::Alert;
use super::battery::BatterySnapshot;

/// Historical-window granularity requested by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeRange {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[serde(rename = "30d")]
    Month,
}

impl TimeRange {
    /// Unrecognized selectors fall back to the 24-hour view.
    pub fn parse(s: &str) -> Self {
        match s {
            "7d" => TimeRange::Week,
            "30d" => TimeRange::Month,
            _ => TimeRange::Day,
        }
    }

    /// Number of points in the series for this range.
    pub fn points(self) -> usize {
        match self {
            TimeRange::Day => 24,
            TimeRange::Week => 7,
            TimeRange::Month => 30,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
            TimeRange::Month => "30d",
        }
    }
}

/// One period of the historical chart series. Index 0 is the most recent
/// period, counting backward.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalPoint {
    pub time: String,
    pub charge_level: i64,
    pub temperature: i64,
    pub voltage: i64,
}

/// One month of the 12-month health forecast. `actual_health` is present
/// only for months that already have recorded data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastPoint {
    pub month: String,
    pub predicted_health: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_health: Option<i64>,
}

/// The unit broadcast on each refresh: the freshest snapshot plus the
/// current alert log contents, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryFrame {
    pub snapshot: BatterySnapshot,
    pub alerts: Vec<Alert>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_ranges() {
        assert_eq!(TimeRange::parse("24h"), TimeRange::Day);
        assert_eq!(TimeRange::parse("7d"), TimeRange::Week);
        assert_eq!(TimeRange::parse("30d"), TimeRange::Month);
    }

    #[test]
    fn test_parse_falls_back_to_day() {
        assert_eq!(TimeRange::parse(""), TimeRange::Day);
        assert_eq!(TimeRange::parse("1y"), TimeRange::Day);
        assert_eq!(TimeRange::parse("7D"), TimeRange::Day);
    }

    #[test]
    fn test_point_counts() {
        assert_eq!(TimeRange::Day.points(), 24);
        assert_eq!(TimeRange::Week.points(), 7);
        assert_eq!(TimeRange::Month.points(), 30);
    }

    #[test]
    fn test_serializes_as_selector_string() {
        assert_eq!(serde_json::to_string(&TimeRange::Day).unwrap(), "\"24h\"");
        assert_eq!(serde_json::to_string(&TimeRange::Week).unwrap(), "\"7d\"");
    }
}
