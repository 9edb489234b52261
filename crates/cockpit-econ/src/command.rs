//! Command-center roll-up: every headline figure in one pass.

use crate::cash::{
    cash_release_waterfall, total_cash_tied, total_contract_value, total_hard_inventory,
    Opportunity,
};
use crate::join::DatasetIndex;
use crate::plants::{classify_plants, PlantStatusReport};
use crate::risk::{composite_risk, RiskScore};
use crate::stock::{critical_shortages, stockout_forecast, HorizonCount, Shortage, SHORTAGE_LIMIT};
use crate::EconError;
use cockpit_core::{CockpitConfig, DashboardData};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Financial snapshots cover a fiscal year; headline values are monthly.
const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandCenterMetrics {
    /// Hard inventory value, monthly average.
    pub monthly_inventory_value: f64,
    /// Cash tied in inventory, monthly average.
    pub monthly_cash_tied: f64,
    pub logistics_spend: f64,
    pub logistics_budget: f64,
    /// Spend as a percent of budget; zero when no budget is configured.
    pub logistics_utilization_pct: f64,
    pub plants: PlantStatusReport,
    pub critical_skus: Vec<Shortage>,
    pub cash_release: Vec<Opportunity>,
    pub risk: RiskScore,
    pub stockout: Vec<HorizonCount>,
}

pub fn command_center(
    data: &DashboardData,
    cfg: &CockpitConfig,
) -> Result<CommandCenterMetrics, EconError> {
    let index = DatasetIndex::new(data);
    let plants = classify_plants(data, &cfg.regions)?;
    let logistics_spend = total_contract_value(&data.providers_3pl);
    let logistics_utilization_pct = if cfg.logistics_budget_eur > 0.0 {
        logistics_spend / cfg.logistics_budget_eur * 100.0
    } else {
        0.0
    };

    let metrics = CommandCenterMetrics {
        monthly_inventory_value: total_hard_inventory(&data.financials) / MONTHS_PER_YEAR,
        monthly_cash_tied: total_cash_tied(&data.financials) / MONTHS_PER_YEAR,
        logistics_spend,
        logistics_budget: cfg.logistics_budget_eur,
        logistics_utilization_pct,
        plants,
        critical_skus: critical_shortages(&index, SHORTAGE_LIMIT),
        cash_release: cash_release_waterfall(data, &cfg.opportunity),
        risk: composite_risk(&data.bom, &cfg.risk),
        stockout: stockout_forecast(&index),
    };
    info!(
        plants = data.plants.len(),
        critical_plants = metrics.plants.counts.critical,
        shortages = metrics.critical_skus.len(),
        risk = metrics.risk.total,
        "command center metrics computed"
    );
    Ok(metrics)
}
