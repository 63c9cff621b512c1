// Streaming dashboard service - Progressive loading over server-sent events
use std::time::Instant;

use futures::stream::Stream;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::StreamExt;

use crate::application::battery_service::BatteryService;
use crate::application::dashboard_service::{bind_chart, bind_tile};
use crate::domain::stream::{
    ChartSkeleton, CompletionEvent, DashboardSkeleton, SeriesSkeleton, StreamMessage, TileSkeleton,
};
use crate::domain::telemetry::TimeRange;
use crate::infrastructure::config::LayoutConfig;

#[derive(Clone)]
pub struct StreamingDashboardService {
    battery: BatteryService,
    layout: LayoutConfig,
}

impl StreamingDashboardService {
    pub fn new(battery: BatteryService, layout: LayoutConfig) -> Self {
        Self { battery, layout }
    }

    /// Progressive dashboard load: the skeleton goes out first, each widget
    /// follows as its task resolves, and the completion event fires once
    /// every widget task has finished.
    pub async fn stream_dashboard(&self, range: TimeRange) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(100);
        let start_time = Instant::now();
        tracing::debug!(range = range.as_str(), "dashboard stream started");

        let skeleton = build_skeleton(&self.layout);
        let total_widgets = skeleton.tiles.len() + skeleton.charts.len();
        let _ = tx.send(StreamMessage::Skeleton(skeleton)).await;

        let frame = self.battery.current_frame();
        let mut tasks = JoinSet::new();

        for tile_layout in &self.layout.tiles {
            let tx = tx.clone();
            let tile_layout = tile_layout.clone();
            let snapshot = frame.snapshot.clone();

            tasks.spawn(async move {
                let update = bind_tile(&tile_layout, &snapshot);
                let _ = tx.send(StreamMessage::TileUpdate(update)).await;
            });
        }

        for chart_layout in &self.layout.charts {
            let tx = tx.clone();
            let chart_layout = chart_layout.clone();
            let battery = self.battery.clone();
            let snapshot = frame.snapshot.clone();

            tasks.spawn(async move {
                match bind_chart(&battery, &chart_layout, range, &snapshot).await {
                    Ok(update) => {
                        let _ = tx.send(StreamMessage::ChartUpdate(update)).await;
                    }
                    Err(err) => {
                        tracing::warn!(chart = %chart_layout.id, "chart resolution failed: {err:#}");
                    }
                }
            });
        }

        // Completion fires when every widget task has actually finished, and
        // reports the real elapsed time.
        tokio::spawn(async move {
            while tasks.join_next().await.is_some() {}

            let complete = CompletionEvent {
                widget_count: total_widgets,
                duration_ms: start_time.elapsed().as_millis() as u64,
            };
            let _ = tx.send(StreamMessage::Complete(complete)).await;
        });

        rx
    }

    /// Continuous feed of telemetry frames, one per monitor tick, starting
    /// with the current frame.
    pub fn live_frames(&self) -> impl Stream<Item = StreamMessage> + use<> {
        WatchStream::new(self.battery.subscribe()).map(StreamMessage::Frame)
    }
}

fn build_skeleton(layout: &LayoutConfig) -> DashboardSkeleton {
    let tiles = layout
        .tiles
        .iter()
        .map(|t| TileSkeleton {
            id: t.id.clone(),
            title: t.title.clone(),
            unit: t.unit.clone(),
            precision: t.precision,
        })
        .collect();

    let charts = layout
        .charts
        .iter()
        .map(|c| ChartSkeleton {
            id: c.id.clone(),
            title: c.title.clone(),
            unit: c.unit.clone(),
            kind: c.kind,
            y_min: c.y_min,
            y_max: c.y_max,
            fraction_digits: c.fraction_digits,
            reference_line: c.reference_line.clone(),
            series: c
                .series
                .iter()
                .map(|s| SeriesSkeleton {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    color: s.color.clone(),
                })
                .collect(),
        })
        .collect();

    DashboardSkeleton {
        title: layout.title.clone(),
        tiles,
        charts,
    }
}
