// Simulated battery - synthetic telemetry source
use std::f64::consts::PI;

use async_trait::async_trait;
use chrono::Utc;

use crate::application::telemetry_source::TelemetrySource;
use crate::domain::battery::{BatteryCell, BatterySnapshot};
use crate::domain::telemetry::{ForecastPoint, HistoricalPoint, TimeRange};

const CELL_COUNT: usize = 10;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Most recent day first, counting backward through the week.
const WEEKDAYS: [&str; 7] = ["Sun", "Sat", "Fri", "Thu", "Wed", "Tue", "Mon"];

/// Stand-in for a real BMS feed. Every call produces a fresh random sample;
/// nothing is cached between calls, and all generators are total.
pub struct SimulatedBattery;

impl SimulatedBattery {
    pub fn new() -> Self {
        Self
    }
}

impl Default for SimulatedBattery {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TelemetrySource for SimulatedBattery {
    async fn sample(&self) -> anyhow::Result<BatterySnapshot> {
        Ok(generate_snapshot())
    }

    async fn history(&self, range: TimeRange) -> anyhow::Result<Vec<HistoricalPoint>> {
        Ok(generate_history(range))
    }

    async fn forecast(&self) -> anyhow::Result<Vec<ForecastPoint>> {
        Ok(generate_forecast())
    }
}

fn generate_snapshot() -> BatterySnapshot {
    let temperature = 20 + fastrand::i64(0..30);
    let health = 70 + fastrand::i64(0..30);

    // Cell values jitter around the pack values independently; they are
    // never averaged back into them.
    let cells = (1..=CELL_COUNT)
        .map(|n| BatteryCell {
            id: format!("Cell {n}"),
            voltage: 3.5 + fastrand::f64() * 0.5,
            temperature: temperature as f64 + (fastrand::f64() * 5.0 - 2.5),
            health: health as f64 + (fastrand::f64() * 10.0 - 5.0),
        })
        .collect();

    BatterySnapshot {
        charge_level: fastrand::i64(0..100),
        temperature,
        voltage: 350 + fastrand::i64(0..100),
        health,
        charging: fastrand::f64() > 0.7,
        cells,
        last_updated: Utc::now(),
    }
}

fn generate_history(range: TimeRange) -> Vec<HistoricalPoint> {
    let points = range.points();

    (0..points)
        .map(|i| {
            let time = match range {
                TimeRange::Day => format!("{}:00", 23 - i),
                TimeRange::Week => WEEKDAYS[i].to_string(),
                TimeRange::Month => format!("Day {}", points - i),
            };

            // Sinusoid trend plus uniform noise, clamped per field then
            // rounded.
            let base_charge = 50.0 + (i as f64 / (points as f64 / 2.0) * PI).sin() * 30.0;
            let base_temp = 30.0 + (i as f64 / (points as f64 / 3.0) * PI).sin() * 10.0;
            let base_voltage = 380.0 + (i as f64 / (points as f64 / 4.0) * PI).sin() * 30.0;

            HistoricalPoint {
                time,
                charge_level: clamp_round(base_charge + noise(5.0), 10.0, 100.0),
                temperature: clamp_round(base_temp + noise(2.5), 20.0, 50.0),
                voltage: clamp_round(base_voltage + noise(5.0), 350.0, 420.0),
            }
        })
        .collect()
}

fn generate_forecast() -> Vec<ForecastPoint> {
    MONTHS
        .iter()
        .enumerate()
        .map(|(i, month)| {
            let predicted = (100.0 - i as f64 * 3.0 + noise(3.0)).max(50.0);

            // Recorded data exists only for the first half of the year; the
            // actual value jitters around the unrounded prediction.
            let actual_health =
                (i < 6).then(|| (predicted + noise(5.0)).max(50.0).round() as i64);

            ForecastPoint {
                month: (*month).to_string(),
                predicted_health: predicted.round() as i64,
                actual_health,
            }
        })
        .collect()
}

/// Uniform in [-amplitude, amplitude).
fn noise(amplitude: f64) -> f64 {
    fastrand::f64() * amplitude * 2.0 - amplitude
}

fn clamp_round(value: f64, min: f64, max: f64) -> i64 {
    value.clamp(min, max).round() as i64
}
