#![deny(warnings)]

//! Mock analytics behind the AI page: demand forecast, anomaly series and
//! the supplier watchlist.
//!
//! Nothing here is a trained model. Every generator takes an explicit seed
//! and draws from `ChaCha8Rng`, so a fixed seed reproduces the same series.

pub mod anomaly;
pub mod forecast;
pub mod suppliers;

pub use anomaly::{
    anomaly_series, AnomalyMetric, AnomalyPoint, AnomalySeries, DetectedAnomaly, Severity,
};
pub use forecast::{demand_forecast, DemandForecast, ForecastPoint};
pub use suppliers::{
    risk_distribution, supplier_watchlist, RiskLevel, RiskLevelCount, WatchedSupplier,
};

use cockpit_core::BomItem;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum AiError {
    #[error("date out of range: {0}")]
    DateOutOfRange(String),
}

/// Components offered in the forecast picker.
pub const FORECAST_SKU_LIMIT: usize = 5;

/// First `n` Critical BOM items, in input order.
pub fn critical_skus(bom: &[BomItem], n: usize) -> Vec<&BomItem> {
    bom.iter().filter(|b| b.is_critical()).take(n).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cockpit_core::Criticality;

    #[test]
    fn picks_critical_in_order() {
        let mk = |code: &str, c: Criticality| BomItem {
            sku_code: code.to_string(),
            criticality: c,
            ..BomItem::default()
        };
        let bom = vec![
            mk("a", Criticality::High),
            mk("b", Criticality::Critical),
            mk("c", Criticality::Critical),
            mk("d", Criticality::Critical),
        ];
        let picked: Vec<&str> = critical_skus(&bom, 2)
            .iter()
            .map(|b| b.sku_code.as_str())
            .collect();
        assert_eq!(picked, ["b", "c"]);
        assert!(critical_skus(&[], FORECAST_SKU_LIMIT).is_empty());
    }
}
