//! Simulation inputs.

use crate::SimError;
use cockpit_core::Scenario;
use serde::{Deserialize, Serialize};

/// Largest adjustment magnitude (percent) fed to the model. Larger finite
/// inputs are clamped so every derived figure stays finite.
pub const MAX_ADJUSTMENT_PCT: f64 = 1_000_000.0;

/// The three percentage adjustments driving a simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimParams {
    /// Change in annual production volume, percent.
    pub production_delta: f64,
    /// Change in supplier lead times, percent.
    pub lead_time_variance: f64,
    /// Change in safety stock, percent.
    pub safety_stock_adj: f64,
}

/// Percentages converted to scale factors (`1 + pct / 100`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Multipliers {
    pub production: f64,
    pub lead_time: f64,
    pub safety_stock: f64,
}

fn multiplier(pct: f64) -> f64 {
    1.0 + pct / 100.0
}

impl SimParams {
    pub fn new(production_delta: f64, lead_time_variance: f64, safety_stock_adj: f64) -> Self {
        Self {
            production_delta,
            lead_time_variance,
            safety_stock_adj,
        }
    }

    /// Re-seed parameters from a saved scenario.
    pub fn from_scenario(s: &Scenario) -> Self {
        Self::new(
            s.production_delta_pct,
            s.lead_time_variance_pct,
            s.safety_stock_adj_pct,
        )
    }

    pub fn is_identity(&self) -> bool {
        self.production_delta == 0.0
            && self.lead_time_variance == 0.0
            && self.safety_stock_adj == 0.0
    }

    pub fn validate(&self) -> Result<(), SimError> {
        if !self.production_delta.is_finite() {
            return Err(SimError::NonFinite("production_delta"));
        }
        if !self.lead_time_variance.is_finite() {
            return Err(SimError::NonFinite("lead_time_variance"));
        }
        if !self.safety_stock_adj.is_finite() {
            return Err(SimError::NonFinite("safety_stock_adj"));
        }
        Ok(())
    }

    /// Clamp each adjustment to `±MAX_ADJUSTMENT_PCT`.
    pub fn clamped(self) -> Self {
        let c = |v: f64| v.clamp(-MAX_ADJUSTMENT_PCT, MAX_ADJUSTMENT_PCT);
        Self::new(
            c(self.production_delta),
            c(self.lead_time_variance),
            c(self.safety_stock_adj),
        )
    }

    pub fn multipliers(&self) -> Multipliers {
        Multipliers {
            production: multiplier(self.production_delta),
            lead_time: multiplier(self.lead_time_variance),
            safety_stock: multiplier(self.safety_stock_adj),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multipliers_from_percent() {
        let m = SimParams::new(25.0, -50.0, 0.0).multipliers();
        assert_eq!(m.production, 1.25);
        assert_eq!(m.lead_time, 0.5);
        assert_eq!(m.safety_stock, 1.0);
    }

    #[test]
    fn non_finite_rejected() {
        assert_eq!(
            SimParams::new(f64::NAN, 0.0, 0.0).validate(),
            Err(SimError::NonFinite("production_delta"))
        );
        let infinite = SimParams::new(0.0, 0.0, f64::NEG_INFINITY);
        assert!(infinite.validate().is_err());
        assert!(SimParams::default().validate().is_ok());
    }

    #[test]
    fn extreme_values_clamped() {
        let p = SimParams::new(1e300, -1e300, 5.0).clamped();
        assert_eq!(p.production_delta, MAX_ADJUSTMENT_PCT);
        assert_eq!(p.lead_time_variance, -MAX_ADJUSTMENT_PCT);
        assert_eq!(p.safety_stock_adj, 5.0);
    }

    #[test]
    fn from_saved_scenario() {
        let s = Scenario {
            production_delta_pct: 15.0,
            lead_time_variance_pct: 10.0,
            safety_stock_adj_pct: 20.0,
            ..Scenario::default()
        };
        assert_eq!(
            SimParams::from_scenario(&s),
            SimParams::new(15.0, 10.0, 20.0)
        );
        assert!(SimParams::default().is_identity());
    }
}
