//! Cockpit configuration.
//!
//! All knobs have defaults matching the production dashboard, so an empty
//! YAML document (or no file at all) yields a working configuration.

use crate::LoadError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Environment variable overriding [`CockpitConfig::api_base`].
pub const API_BASE_ENV: &str = "COCKPIT_API_BASE";

/// Fixed baseline assumptions of the scenario simulator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimBaseline {
    /// Planned vehicles per year before any adjustment.
    pub base_annual_vehicles: f64,
    /// Component cost per vehicle in EUR.
    pub component_cost_per_vehicle: f64,
    /// Share of per-vehicle component cost held as pipeline inventory.
    pub production_cost_share: f64,
    /// Baseline monthly inventory value in EUR.
    pub base_monthly_inventory_value: f64,
    /// Annual carrying-cost rate (0.22 = 22%).
    pub carrying_rate: f64,
    /// Baseline days of inventory.
    pub base_doi: f64,
}

impl Default for SimBaseline {
    fn default() -> Self {
        Self {
            base_annual_vehicles: 8_500.0,
            component_cost_per_vehicle: 520_000.0,
            production_cost_share: 0.15,
            base_monthly_inventory_value: 900_000_000.0,
            carrying_rate: 0.22,
            base_doi: 42.0,
        }
    }
}

/// Heuristic constants of the composite risk score.
///
/// The factor scores are fixed estimates; only lead-time risk is derived
/// from data. Each factor is capped at its `*_max`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskWeights {
    /// Assumed share (percent) of spend concentrated in single-source suppliers.
    pub supplier_concentration_pct: f64,
    pub supplier_concentration_max: f64,
    /// Average lead time that maps to a full lead-time score.
    pub lead_time_horizon_days: f64,
    pub lead_time_max: f64,
    pub geographic_score: f64,
    pub geographic_max: f64,
    pub stockout_score: f64,
    pub stockout_max: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            supplier_concentration_pct: 35.0,
            supplier_concentration_max: 30.0,
            lead_time_horizon_days: 90.0,
            lead_time_max: 30.0,
            geographic_score: 8.0,
            geographic_max: 25.0,
            stockout_score: 12.0,
            stockout_max: 15.0,
        }
    }
}

/// Fractions used by the cash-release opportunity estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpportunityRates {
    pub slow_moving: f64,
    pub excess_safety_stock: f64,
    pub supplier_consolidation: f64,
    pub lead_time_reduction: f64,
}

impl Default for OpportunityRates {
    fn default() -> Self {
        Self {
            slow_moving: 0.30,
            excess_safety_stock: 0.12,
            supplier_consolidation: 0.08,
            lead_time_reduction: 0.05,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CockpitConfig {
    /// Backend base URL, without the `/api` suffix.
    pub api_base: String,
    /// Annual 3PL budget in EUR.
    pub logistics_budget_eur: f64,
    /// Regions reported in the per-region status breakdown, in display order.
    pub regions: Vec<String>,
    /// Seed for the mock analytics generators.
    pub analytics_seed: u64,
    pub simulation: SimBaseline,
    pub risk: RiskWeights,
    pub opportunity: OpportunityRates,
}

impl Default for CockpitConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000".to_string(),
            logistics_budget_eur: 200_000_000.0,
            regions: ["Europe", "Americas", "Asia-Pacific", "MEA"]
                .iter()
                .map(|r| r.to_string())
                .collect(),
            analytics_seed: 42,
            simulation: SimBaseline::default(),
            risk: RiskWeights::default(),
            opportunity: OpportunityRates::default(),
        }
    }
}

impl CockpitConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, LoadError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))
    }

    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), "loaded cockpit config");
        Self::from_yaml_str(&text)
    }

    /// Apply environment overrides on top of file values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(base) = std::env::var(API_BASE_ENV) {
            if !base.trim().is_empty() {
                self.api_base = base;
            }
        }
        self
    }
}
