// Battery domain model
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the 10 simulated sub-units of the battery pack.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryCell {
    pub id: String,
    pub voltage: f64,
    pub temperature: f64,
    pub health: f64,
}

/// One full sample of battery state at a point in time.
///
/// Fields are independently sampled; no cross-field physical consistency
/// is enforced. Cell values are jittered around the pack values, never
/// averaged back into them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatterySnapshot {
    pub charge_level: i64,
    pub temperature: i64,
    pub voltage: i64,
    pub health: i64,
    pub charging: bool,
    pub cells: Vec<BatteryCell>,
    pub last_updated: DateTime<Utc>,
}

impl BatterySnapshot {
    pub const VOLTAGE_CAPTION: &'static str = "Nominal range: 350V - 420V";

    pub fn charge_status(&self) -> &'static str {
        if self.charging {
            "Currently charging"
        } else {
            "Not charging"
        }
    }

    pub fn temperature_status(&self) -> &'static str {
        if self.temperature > 45 {
            "Critical temperature"
        } else if self.temperature > 35 {
            "High temperature"
        } else {
            "Normal temperature"
        }
    }

    pub fn health_status(&self) -> &'static str {
        if self.health > 80 {
            "Excellent condition"
        } else if self.health > 60 {
            "Good condition"
        } else {
            "Degraded condition"
        }
    }
}
