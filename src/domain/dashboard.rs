// Dashboard domain models - chart-ready widget data
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub value: f64,
    pub precision: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TileData {
    pub fn new(
        id: String,
        title: String,
        unit: String,
        value: f64,
        precision: i32,
        status: Option<String>,
    ) -> Self {
        Self {
            id,
            title,
            unit,
            value,
            precision,
            status,
        }
    }
}

/// One labeled point of a chart series. Labels are whatever the source
/// produced: a time-of-day, a weekday, a cell id, a month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub points: Vec<SeriesPoint>,
}

impl SeriesData {
    pub fn new(id: String, name: String, color: Option<String>, points: Vec<SeriesPoint>) -> Self {
        Self {
            id,
            name,
            color,
            points,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    MultiLine,
    Area,
    Bar,
}

/// A horizontal marker drawn across the chart, e.g. the critical-health
/// line on the forecast chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraction_digits: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_line: Option<ReferenceLine>,
    pub series: Vec<SeriesData>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub title: String,
    pub tiles: Vec<TileData>,
    pub charts: Vec<ChartData>,
}

impl Dashboard {
    pub fn new(title: String, tiles: Vec<TileData>, charts: Vec<ChartData>) -> Self {
        Self {
            title,
            tiles,
            charts,
        }
    }
}
