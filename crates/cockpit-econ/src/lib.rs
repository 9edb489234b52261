#![deny(warnings)]

//! Aggregation engine: dashboard summaries over cockpit datasets.
//!
//! Every function here is a pure reduction of already-loaded records:
//! - Plant status classification from inventory-value quantiles
//! - Critical-SKU shortages and stock-out horizon buckets
//! - Cash-release opportunity waterfall and composite risk score
//! - 3PL spend, regional split and consolidation model
//!
//! Empty inputs produce zero/empty outputs. Unresolved joins (inventory rows
//! pointing at unknown plants or SKUs) are carried with absent join fields.

pub mod cash;
pub mod command;
pub mod join;
pub mod logistics;
pub mod plants;
pub mod risk;
pub mod stock;

pub use cash::{cash_release_waterfall, Opportunity, OpportunityKind};
pub use command::{command_center, CommandCenterMetrics};
pub use join::{orphan_inventory, DatasetIndex, JoinedInventory};
pub use logistics::{consolidate, expiring_contracts, logistics_summary, LogisticsSummary};
pub use plants::{classify_plants, PlantStatus, PlantStatusReport, PlantSummary};
pub use risk::{composite_risk, RiskFactor, RiskScore};
pub use stock::{critical_shortages, stockout_forecast, HorizonCount, Shortage, StockoutHorizon};

use thiserror::Error;

/// Errors produced by aggregation helpers.
#[derive(Debug, Error, PartialEq)]
pub enum EconError {
    /// Quantile level must be finite and within [0, 1].
    #[error("invalid quantile level: {0}")]
    InvalidQuantile(f64),
}

/// Sample quantile with linear interpolation between order statistics
/// (the "R-7" definition): sort ascending, take position `(n - 1) * q` and
/// interpolate between its floor and ceiling ranks.
///
/// Returns 0 for an empty sample.
///
/// Example:
/// assert_eq!(quantile(&[10.0, 20.0, 30.0, 40.0], 0.75).unwrap(), 32.5);
pub fn quantile(values: &[f64], q: f64) -> Result<f64, EconError> {
    if !q.is_finite() || !(0.0..=1.0).contains(&q) {
        return Err(EconError::InvalidQuantile(q));
    }
    if values.is_empty() {
        return Ok(0.0);
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let pos = (sorted.len() - 1) as f64 * q;
    let base = pos.floor() as usize;
    let rest = pos - base as f64;
    match sorted.get(base + 1) {
        Some(next) => Ok(sorted[base] + rest * (next - sorted[base])),
        None => Ok(sorted[base]),
    }
}
