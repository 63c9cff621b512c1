// Battery monitor - the fixed-cadence refresh loop
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

use crate::application::telemetry_source::TelemetrySource;
use crate::domain::alert::{AlertLog, Thresholds};
use crate::domain::telemetry::TelemetryFrame;

/// Regenerates the snapshot on a fixed interval, evaluates thresholds into
/// the bounded alert log, and broadcasts the resulting frame on a watch
/// channel. Consumers always see the latest frame.
pub struct BatteryMonitor {
    source: Arc<dyn TelemetrySource>,
    thresholds: Thresholds,
    log: AlertLog,
    interval: Duration,
    frame_tx: watch::Sender<TelemetryFrame>,
}

impl BatteryMonitor {
    /// Seeds the initial frame before returning, so the receiver holds a
    /// valid frame before the server starts accepting requests.
    pub async fn new(
        source: Arc<dyn TelemetrySource>,
        thresholds: Thresholds,
        alert_capacity: usize,
        interval: Duration,
    ) -> anyhow::Result<(Self, watch::Receiver<TelemetryFrame>)> {
        let mut log = AlertLog::new(alert_capacity);

        let snapshot = source.sample().await?;
        log.extend(thresholds.evaluate(&snapshot));
        let frame = TelemetryFrame {
            snapshot,
            alerts: log.snapshot(),
        };

        let (frame_tx, frame_rx) = watch::channel(frame);

        let monitor = Self {
            source,
            thresholds,
            log,
            interval,
            frame_tx,
        };
        Ok((monitor, frame_rx))
    }

    /// Spawn the refresh loop. A failed tick is logged and the loop keeps
    /// going; the loop exits when the token is cancelled.
    pub fn start(mut self, cancel: CancellationToken) {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            // The first tick resolves immediately and the initial frame is
            // already seeded, so consume it before entering the loop.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(err) = self.tick_once().await {
                            tracing::warn!("battery monitor tick failed: {err:#}");
                        }
                    }
                }
            }
            tracing::info!("battery monitor stopped");
        });
    }

    async fn tick_once(&mut self) -> anyhow::Result<()> {
        let snapshot = self.source.sample().await?;

        let fired = self.thresholds.evaluate(&snapshot);
        if !fired.is_empty() {
            tracing::info!(count = fired.len(), "alert thresholds crossed");
        }
        self.log.extend(fired);

        let frame = TelemetryFrame {
            snapshot,
            alerts: self.log.snapshot(),
        };

        // watch::Sender::send only fails if all receivers dropped - benign
        let _ = self.frame_tx.send(frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;

    use crate::domain::alert::AlertKind;
    use crate::domain::battery::BatterySnapshot;
    use crate::domain::telemetry::{ForecastPoint, HistoricalPoint, TimeRange};

    /// Always reports the same distressed battery.
    struct StubSource;

    fn stub_snapshot() -> BatterySnapshot {
        BatterySnapshot {
            charge_level: 15,
            temperature: 42,
            voltage: 405,
            health: 85,
            charging: false,
            cells: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    #[async_trait]
    impl TelemetrySource for StubSource {
        async fn sample(&self) -> anyhow::Result<BatterySnapshot> {
            Ok(stub_snapshot())
        }

        async fn history(&self, _range: TimeRange) -> anyhow::Result<Vec<HistoricalPoint>> {
            Ok(Vec::new())
        }

        async fn forecast(&self) -> anyhow::Result<Vec<ForecastPoint>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_initial_frame_is_seeded_with_alerts() {
        let (_, frame_rx) = BatteryMonitor::new(
            Arc::new(StubSource),
            Thresholds::default(),
            5,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        let frame = frame_rx.borrow().clone();
        assert_eq!(frame.snapshot.charge_level, 15);
        // All three thresholds fire in one cycle.
        assert_eq!(frame.alerts.len(), 3);
        assert_eq!(frame.alerts[0].kind, AlertKind::HighVoltage);
    }

    #[tokio::test]
    async fn test_log_stays_bounded_across_ticks() {
        let (mut monitor, frame_rx) = BatteryMonitor::new(
            Arc::new(StubSource),
            Thresholds::default(),
            5,
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        for _ in 0..4 {
            monitor.tick_once().await.unwrap();
        }

        let frame = frame_rx.borrow().clone();
        assert_eq!(frame.alerts.len(), 5);
        assert_eq!(frame.alerts[0].kind, AlertKind::HighVoltage);
    }
}
