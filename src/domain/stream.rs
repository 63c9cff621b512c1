// Progressive-load stream messages
use serde::Serialize;

use super::dashboard::{ChartData, ChartKind, ReferenceLine, TileData};
use super::telemetry::TelemetryFrame;

/// Dashboard structure sent before any widget has resolved: everything the
/// client needs to lay out the page, minus the data.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSkeleton {
    pub title: String,
    pub tiles: Vec<TileSkeleton>,
    pub charts: Vec<ChartSkeleton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileSkeleton {
    pub id: String,
    pub title: String,
    pub unit: String,
    pub precision: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesSkeleton {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSkeleton {
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
    pub series: Vec<SeriesSkeleton>,
}

/// Sent once every widget task has finished.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEvent {
    pub widget_count: usize,
    pub duration_ms: u64,
}

/// One event of a dashboard stream. Serialized with a `type` tag so an
/// EventSource client can dispatch on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum StreamMessage {
    Skeleton(DashboardSkeleton),
    TileUpdate(TileData),
    ChartUpdate(ChartData),
    Frame(TelemetryFrame),
    Complete(CompletionEvent),
}
