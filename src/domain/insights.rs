// Derived recommendations - charging advice and health outlook
use serde::Serialize;

use super::battery::BatterySnapshot;

const BEST_PRACTICES: [&str; 5] = [
    "Maintain between 20-80%",
    "Avoid extreme temperatures",
    "Use recommended chargers",
    "Avoid frequent fast charging",
    "Scheduled charging",
];

/// Charging guidance derived from the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargingAdvice {
    pub charging: bool,
    pub schedule: &'static str,
    pub estimated_minutes: i64,
    pub rate: &'static str,
    pub efficiency_percent: u8,
    pub loss_percent: u8,
    pub best_practices: Vec<&'static str>,
}

impl ChargingAdvice {
    pub fn derive(snapshot: &BatterySnapshot) -> Self {
        let schedule = if snapshot.charge_level < 20 {
            "Immediate charging recommended"
        } else if snapshot.charge_level < 50 {
            "Charging recommended within 24 hours"
        } else {
            "Charging not required at this time"
        };

        let estimated_minutes = ((100 - snapshot.charge_level) as f64 * 0.6).round() as i64;

        let rate = if snapshot.temperature > 35 {
            "Slow charging (0.5C)"
        } else {
            "Standard charging (1C)"
        };

        Self {
            charging: snapshot.charging,
            schedule,
            estimated_minutes,
            rate,
            efficiency_percent: 85,
            loss_percent: 15,
            best_practices: BEST_PRACTICES.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EfficiencyTrend {
    Stable,
    Declining,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnomalyRisk {
    Low,
    High,
}

/// Long-term health indicators derived from the current snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthOutlook {
    pub remaining_lifespan_percent: i64,
    pub efficiency_trend: EfficiencyTrend,
    pub anomaly_risk: AnomalyRisk,
}

impl HealthOutlook {
    pub fn derive(snapshot: &BatterySnapshot) -> Self {
        let efficiency_trend = if snapshot.health > 80 {
            EfficiencyTrend::Stable
        } else {
            EfficiencyTrend::Declining
        };

        let anomaly_risk = if snapshot.temperature > 40 || snapshot.voltage > 410 {
            AnomalyRisk::High
        } else {
            AnomalyRisk::Low
        };

        Self {
            remaining_lifespan_percent: (snapshot.health as f64 * 0.8).round() as i64,
            efficiency_trend,
            anomaly_risk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn snapshot(charge_level: i64, temperature: i64, voltage: i64, health: i64) -> BatterySnapshot {
        BatterySnapshot {
            charge_level,
            temperature,
            voltage,
            health,
            charging: false,
            cells: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    #[test]
    fn test_charging_schedule_bands() {
        let advice = ChargingAdvice::derive(&snapshot(15, 30, 380, 90));
        assert_eq!(advice.schedule, "Immediate charging recommended");

        let advice = ChargingAdvice::derive(&snapshot(49, 30, 380, 90));
        assert_eq!(advice.schedule, "Charging recommended within 24 hours");

        let advice = ChargingAdvice::derive(&snapshot(50, 30, 380, 90));
        assert_eq!(advice.schedule, "Charging not required at this time");
    }

    #[test]
    fn test_estimated_charge_time() {
        // (100 - 15) * 0.6 = 51 minutes
        let advice = ChargingAdvice::derive(&snapshot(15, 30, 380, 90));
        assert_eq!(advice.estimated_minutes, 51);

        let advice = ChargingAdvice::derive(&snapshot(100, 30, 380, 90));
        assert_eq!(advice.estimated_minutes, 0);
    }

    #[test]
    fn test_charging_rate_depends_on_temperature() {
        let advice = ChargingAdvice::derive(&snapshot(50, 36, 380, 90));
        assert_eq!(advice.rate, "Slow charging (0.5C)");

        let advice = ChargingAdvice::derive(&snapshot(50, 35, 380, 90));
        assert_eq!(advice.rate, "Standard charging (1C)");
    }

    #[test]
    fn test_efficiency_split_and_practices() {
        let advice = ChargingAdvice::derive(&snapshot(50, 30, 380, 90));
        assert_eq!(advice.efficiency_percent, 85);
        assert_eq!(advice.loss_percent, 15);
        assert_eq!(advice.best_practices.len(), 5);
    }

    #[test]
    fn test_outlook_lifespan_and_trend() {
        let outlook = HealthOutlook::derive(&snapshot(50, 30, 380, 85));
        assert_eq!(outlook.remaining_lifespan_percent, 68);
        assert_eq!(outlook.efficiency_trend, EfficiencyTrend::Stable);

        let outlook = HealthOutlook::derive(&snapshot(50, 30, 380, 80));
        assert_eq!(outlook.efficiency_trend, EfficiencyTrend::Declining);
    }

    #[test]
    fn test_anomaly_risk() {
        assert_eq!(
            HealthOutlook::derive(&snapshot(50, 41, 380, 90)).anomaly_risk,
            AnomalyRisk::High
        );
        assert_eq!(
            HealthOutlook::derive(&snapshot(50, 30, 411, 90)).anomaly_risk,
            AnomalyRisk::High
        );
        assert_eq!(
            HealthOutlook::derive(&snapshot(50, 40, 410, 90)).anomaly_risk,
            AnomalyRisk::Low
        );
    }
}
