//! Six-month demand forecast for one component.

use cockpit_core::numeric::round_half_up;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

const HISTORY_MONTHS: [&str; 6] = ["Aug", "Sep", "Oct", "Nov", "Dec", "Jan"];
const FORECAST_MONTHS: [&str; 6] = ["Feb", "Mar", "Apr", "May", "Jun", "Jul"];

const BASE_DEMAND: f64 = 1_200.0;
const DEMAND_PER_NAME_CHAR: f64 = 50.0;
const HISTORY_NOISE: f64 = 0.1;
const FORECAST_NOISE: f64 = 0.05;
const MONTHLY_GROWTH: f64 = 0.03;
const BASE_ACCURACY: f64 = 94.2;
const MIN_ACCURACY: f64 = 75.0;
const ACCURACY_PENALTY: f64 = 0.15;

/// One month of the combined chart.
///
/// The first forecast month also carries the last actual so the two lines
/// join.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month: String,
    pub actual: Option<i64>,
    pub forecast: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DemandForecast {
    pub sku_name: String,
    pub points: Vec<ForecastPoint>,
    /// Last forecast month vs last historical month, percent.
    pub pct_change: f64,
    pub accuracy: f64,
    /// Confidence band label, e.g. "95%".
    pub confidence: &'static str,
}

fn confidence(scenario_pct: f64) -> &'static str {
    let a = scenario_pct.abs();
    if a < 15.0 {
        "95%"
    } else if a < 30.0 {
        "85%"
    } else {
        "75%"
    }
}

/// Example:
/// let f = demand_forecast("Hydraulic Pump", 10.0, 7);
/// assert_eq!(f.points.len(), 12);
pub fn demand_forecast(sku_name: &str, scenario_pct: f64, seed: u64) -> DemandForecast {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let base = BASE_DEMAND + sku_name.chars().count() as f64 * DEMAND_PER_NAME_CHAR;
    let multiplier = 1.0 + scenario_pct / 100.0;

    let history: Vec<i64> = HISTORY_MONTHS
        .iter()
        .map(|_| {
            let u: f64 = rng.gen_range(-HISTORY_NOISE..=HISTORY_NOISE);
            round_half_up(base * (1.0 + u)) as i64
        })
        .collect();
    let last_actual = history.last().copied().unwrap_or(0);

    let forecast: Vec<i64> = (0..FORECAST_MONTHS.len())
        .map(|i| {
            let u: f64 = rng.gen_range(-FORECAST_NOISE..=FORECAST_NOISE);
            let growth = 1.0 + i as f64 * MONTHLY_GROWTH + u;
            round_half_up(last_actual as f64 * multiplier * growth) as i64
        })
        .collect();
    let last_forecast = forecast.last().copied().unwrap_or(0);

    let mut points: Vec<ForecastPoint> = HISTORY_MONTHS
        .iter()
        .zip(&history)
        .map(|(m, &d)| ForecastPoint {
            month: m.to_string(),
            actual: Some(d),
            forecast: None,
        })
        .collect();
    points.extend(
        FORECAST_MONTHS
            .iter()
            .zip(&forecast)
            .enumerate()
            .map(|(i, (m, &d))| ForecastPoint {
                month: m.to_string(),
                actual: (i == 0).then_some(last_actual),
                forecast: Some(d),
            }),
    );

    let pct_change = if last_actual != 0 {
        (last_forecast - last_actual) as f64 / last_actual as f64 * 100.0
    } else {
        0.0
    };
    debug!(
        sku = sku_name,
        scenario_pct,
        seed,
        pct_change,
        "demand forecast"
    );
    let penalty = scenario_pct.abs() * ACCURACY_PENALTY;
    DemandForecast {
        sku_name: sku_name.to_string(),
        points,
        pct_change,
        accuracy: (BASE_ACCURACY - penalty).max(MIN_ACCURACY),
        confidence: confidence(scenario_pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn shape_and_bridge_point() {
        let f = demand_forecast("Hydraulic Pump", 0.0, 1);
        assert_eq!(f.points.len(), 12);
        assert_eq!(f.points[0].month, "Aug");
        assert_eq!(f.points[6].month, "Feb");
        for p in &f.points[..6] {
            assert!(p.actual.is_some() && p.forecast.is_none());
        }
        assert_eq!(f.points[6].actual, f.points[5].actual);
        for p in &f.points[7..] {
            assert!(p.actual.is_none() && p.forecast.is_some());
        }
    }

    #[test]
    fn accuracy_and_confidence_bands() {
        let f = demand_forecast("x", 10.0, 3);
        assert!((f.accuracy - 92.7).abs() < 1e-9);
        assert_eq!(f.confidence, "95%");
        assert_eq!(demand_forecast("x", -20.0, 3).confidence, "85%");
        let far = demand_forecast("x", 200.0, 3);
        assert_eq!(far.confidence, "75%");
        assert_eq!(far.accuracy, 75.0);
    }

    #[test]
    fn same_seed_same_series() {
        assert_eq!(
            demand_forecast("Axle", 15.0, 42),
            demand_forecast("Axle", 15.0, 42)
        );
        assert_ne!(
            demand_forecast("Axle", 15.0, 42).points,
            demand_forecast("Axle", 15.0, 43).points
        );
    }

    proptest! {
        #[test]
        fn history_within_noise_band(name in "[A-Za-z ]{0,30}", seed in any::<u64>()) {
            let f = demand_forecast(&name, 0.0, seed);
            let base = BASE_DEMAND + name.chars().count() as f64 * DEMAND_PER_NAME_CHAR;
            for p in &f.points[..6] {
                let a = p.actual.unwrap() as f64;
                prop_assert!(a >= (base * 0.9).floor() && a <= (base * 1.1).ceil());
            }
        }
    }
}
