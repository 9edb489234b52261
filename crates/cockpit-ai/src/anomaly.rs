//! 90-day metric series with injected anomalies.

use crate::AiError;
use chrono::{Days, NaiveDate};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const SERIES_DAYS: usize = 90;
/// Anomalies listed under the chart.
pub const DETECTED_LIMIT: usize = 3;
/// Absolute deviation (percent) above which an anomaly is HIGH.
const HIGH_DEVIATION_PCT: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyMetric {
    LeadTimeDelays,
    CostVariations,
    DeliveryPerformance,
}

impl AnomalyMetric {
    pub const ALL: [AnomalyMetric; 3] = [
        AnomalyMetric::LeadTimeDelays,
        AnomalyMetric::CostVariations,
        AnomalyMetric::DeliveryPerformance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AnomalyMetric::LeadTimeDelays => "Lead Time Delays",
            AnomalyMetric::CostVariations => "Cost Variations",
            AnomalyMetric::DeliveryPerformance => "Delivery Performance",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.label().eq_ignore_ascii_case(label))
    }

    pub fn unit(self) -> &'static str {
        match self {
            AnomalyMetric::LeadTimeDelays => "days",
            AnomalyMetric::CostVariations => "€",
            AnomalyMetric::DeliveryPerformance => "%",
        }
    }

    pub fn baseline(self) -> f64 {
        match self {
            AnomalyMetric::LeadTimeDelays => 45.0,
            AnomalyMetric::CostVariations => 125_000.0,
            AnomalyMetric::DeliveryPerformance => 96.0,
        }
    }

    /// Half-width of the uniform noise around the baseline.
    fn noise(self) -> f64 {
        match self {
            AnomalyMetric::LeadTimeDelays => 5.0,
            AnomalyMetric::CostVariations => 8_000.0,
            AnomalyMetric::DeliveryPerformance => 2.0,
        }
    }

    /// Value forced at an injected anomaly day, if any.
    fn spike(self, day: usize) -> Option<f64> {
        let b = self.baseline();
        match (self, day) {
            (AnomalyMetric::LeadTimeDelays, 23 | 24) => Some(b + 28.0),
            (AnomalyMetric::LeadTimeDelays, 67 | 68) => Some(b + 22.0),
            (AnomalyMetric::CostVariations, 15) => Some(b + 45_000.0),
            (AnomalyMetric::CostVariations, 45) => Some(b - 38_000.0),
            (AnomalyMetric::CostVariations, 78) => Some(b + 52_000.0),
            (AnomalyMetric::DeliveryPerformance, 30 | 31) => Some(78.0),
            (AnomalyMetric::DeliveryPerformance, 60) => Some(75.0),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyPoint {
    pub date: NaiveDate,
    pub value: f64,
    pub is_anomaly: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DetectedAnomaly {
    pub date: NaiveDate,
    pub value: f64,
    /// Deviation from baseline, percent.
    pub deviation_pct: f64,
    pub severity: Severity,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AnomalySeries {
    pub metric: AnomalyMetric,
    pub baseline: f64,
    pub unit: &'static str,
    pub points: Vec<AnomalyPoint>,
    pub detected: Vec<DetectedAnomaly>,
}

/// Daily series for the `SERIES_DAYS` days ending the day before `end_date`.
pub fn anomaly_series(
    metric: AnomalyMetric,
    end_date: NaiveDate,
    seed: u64,
) -> Result<AnomalySeries, AiError> {
    let start = end_date
        .checked_sub_days(Days::new(SERIES_DAYS as u64))
        .ok_or_else(|| AiError::DateOutOfRange(end_date.to_string()))?;
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let baseline = metric.baseline();
    let noise = metric.noise();

    let mut points = Vec::with_capacity(SERIES_DAYS);
    for day in 0..SERIES_DAYS {
        let date = start
            .checked_add_days(Days::new(day as u64))
            .ok_or_else(|| AiError::DateOutOfRange(start.to_string()))?;
        let u: f64 = rng.gen_range(-noise..=noise);
        let mut value = baseline + u;
        if metric == AnomalyMetric::DeliveryPerformance {
            value = value.min(100.0);
        }
        let spike = metric.spike(day);
        points.push(AnomalyPoint {
            date,
            value: spike.unwrap_or(value),
            is_anomaly: spike.is_some(),
        });
    }

    let detected: Vec<DetectedAnomaly> = points
        .iter()
        .filter(|p| p.is_anomaly)
        .take(DETECTED_LIMIT)
        .map(|p| {
            let deviation_pct = (p.value - baseline) / baseline * 100.0;
            DetectedAnomaly {
                date: p.date,
                value: p.value,
                deviation_pct,
                severity: if deviation_pct.abs() > HIGH_DEVIATION_PCT {
                    Severity::High
                } else {
                    Severity::Medium
                },
            }
        })
        .collect();
    debug!(metric = metric.label(), %end_date, detected = detected.len(), "anomaly series");
    Ok(AnomalySeries {
        metric,
        baseline,
        unit: metric.unit(),
        points,
        detected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    fn end() -> NaiveDate {
        date(6, 1)
    }

    #[test]
    fn ninety_days_ending_yesterday() {
        let s = anomaly_series(AnomalyMetric::LeadTimeDelays, end(), 9).unwrap();
        assert_eq!(s.points.len(), SERIES_DAYS);
        assert_eq!(s.points.last().unwrap().date, date(5, 31));
        assert_eq!(s.points[0].date, date(3, 3));
        assert_eq!(s.unit, "days");
    }

    #[test]
    fn lead_time_anomalies() {
        let s = anomaly_series(AnomalyMetric::LeadTimeDelays, end(), 9).unwrap();
        assert_eq!(s.points.iter().filter(|p| p.is_anomaly).count(), 4);
        assert_eq!(s.detected.len(), 3);
        // +28 over 45 days is 62%.
        assert_eq!(s.detected[0].severity, Severity::High);
        assert_eq!(s.detected[0].value, 73.0);
        assert_eq!(s.detected[2].value, 67.0);
    }

    #[test]
    fn cost_and_delivery_severity() {
        let cost = anomaly_series(AnomalyMetric::CostVariations, end(), 1).unwrap();
        let sev: Vec<Severity> = cost.detected.iter().map(|d| d.severity).collect();
        assert_eq!(sev, [Severity::High, Severity::High, Severity::High]);
        assert!(cost.detected[1].deviation_pct < 0.0);

        let delivery = anomaly_series(AnomalyMetric::DeliveryPerformance, end(), 1).unwrap();
        assert!(delivery.points.iter().all(|p| p.value <= 100.0));
        for d in &delivery.detected {
            assert_eq!(d.severity, Severity::Medium);
        }
    }

    #[test]
    fn seeded_reproducible() {
        for m in AnomalyMetric::ALL {
            let a = anomaly_series(m, end(), 5).unwrap();
            assert_eq!(a, anomaly_series(m, end(), 5).unwrap());
        }
        let parsed = AnomalyMetric::from_label("cost variations");
        assert_eq!(parsed, Some(AnomalyMetric::CostVariations));
        assert_eq!(AnomalyMetric::from_label("nope"), None);
    }

    #[test]
    fn out_of_range_date() {
        assert!(anomaly_series(AnomalyMetric::LeadTimeDelays, NaiveDate::MIN, 0).is_err());
    }
}
