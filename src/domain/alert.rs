// Threshold alerting - evaluation rules and the bounded alert log
use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::battery::BatterySnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AlertKind {
    LowCharge,
    HighTemperature,
    HighVoltage,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

/// Numeric boundaries that trigger alerts. All comparisons are strict;
/// boundary values do not fire.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub low_charge: i64,
    pub high_temperature: i64,
    pub high_voltage: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            low_charge: 20,
            high_temperature: 40,
            high_voltage: 400,
        }
    }
}

impl Thresholds {
    /// Compare a snapshot against each threshold independently. Fixed
    /// evaluation order: charge, temperature, voltage. Stateless - no
    /// hysteresis, no deduplication of repeated alerts.
    pub fn evaluate(&self, snapshot: &BatterySnapshot) -> Vec<Alert> {
        let mut alerts = Vec::new();
        let raised_at = snapshot.last_updated;

        if snapshot.charge_level < self.low_charge {
            alerts.push(Alert {
                kind: AlertKind::LowCharge,
                message: format!("Low battery alert: {}% remaining", snapshot.charge_level),
                raised_at,
            });
        }

        if snapshot.temperature > self.high_temperature {
            alerts.push(Alert {
                kind: AlertKind::HighTemperature,
                message: format!("High temperature warning: {}°C", snapshot.temperature),
                raised_at,
            });
        }

        if snapshot.voltage > self.high_voltage {
            alerts.push(Alert {
                kind: AlertKind::HighVoltage,
                message: format!("High voltage alert: {}V", snapshot.voltage),
                raised_at,
            });
        }

        alerts
    }
}

/// Bounded alert log. The newest alert always occupies index 0; entries
/// past the capacity are dropped from the tail.
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: VecDeque<Alert>,
    capacity: usize,
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, alert: Alert) {
        self.entries.push_front(alert);
        self.entries.truncate(self.capacity);
    }

    pub fn extend(&mut self, alerts: impl IntoIterator<Item = Alert>) {
        for alert in alerts {
            self.push(alert);
        }
    }

    /// Current contents, newest first.
    pub fn snapshot(&self) -> Vec<Alert> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(charge_level: i64, temperature: i64, voltage: i64) -> BatterySnapshot {
        BatterySnapshot {
            charge_level,
            temperature,
            voltage,
            health: 90,
            charging: false,
            cells: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_all_thresholds_fire_independently() {
        let alerts = Thresholds::default().evaluate(&snapshot(15, 42, 405));
        assert_eq!(alerts.len(), 3);
        assert_eq!(alerts[0].kind, AlertKind::LowCharge);
        assert_eq!(alerts[0].message, "Low battery alert: 15% remaining");
        assert_eq!(alerts[1].kind, AlertKind::HighTemperature);
        assert_eq!(alerts[1].message, "High temperature warning: 42°C");
        assert_eq!(alerts[2].kind, AlertKind::HighVoltage);
        assert_eq!(alerts[2].message, "High voltage alert: 405V");
    }

    #[test]
    fn test_boundary_values_do_not_fire() {
        let alerts = Thresholds::default().evaluate(&snapshot(20, 40, 400));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_nominal_snapshot_is_quiet() {
        let alerts = Thresholds::default().evaluate(&snapshot(75, 30, 380));
        assert!(alerts.is_empty());
    }

    #[test]
    fn test_log_is_bounded_and_newest_first() {
        let mut log = AlertLog::new(5);
        let thresholds = Thresholds::default();

        // Three refresh cycles, three alerts each.
        for _ in 0..3 {
            log.extend(thresholds.evaluate(&snapshot(15, 42, 405)));
        }

        assert_eq!(log.len(), 5);
        // Within one cycle each alert is pushed in evaluation order, so the
        // voltage alert from the latest cycle sits at index 0.
        let entries = log.snapshot();
        assert_eq!(entries[0].kind, AlertKind::HighVoltage);
        assert_eq!(entries[1].kind, AlertKind::HighTemperature);
        assert_eq!(entries[2].kind, AlertKind::LowCharge);
    }
}
