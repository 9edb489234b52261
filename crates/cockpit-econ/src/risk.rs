//! Composite supply-chain risk score.

use cockpit_core::numeric::finite_or_zero;
use cockpit_core::{BomItem, RiskWeights};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskFactorKind {
    SupplierConcentration,
    LeadTimeVariability,
    GeographicExposure,
    StockoutRisk,
}

impl RiskFactorKind {
    pub fn label(self) -> &'static str {
        match self {
            RiskFactorKind::SupplierConcentration => "Supplier Concentration",
            RiskFactorKind::LeadTimeVariability => "Lead Time Variability",
            RiskFactorKind::GeographicExposure => "Geographic Exposure",
            RiskFactorKind::StockoutRisk => "Stock-out Risk",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub factor: RiskFactorKind,
    pub score: f64,
    pub max: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskScore {
    pub total: f64,
    pub breakdown: Vec<RiskFactor>,
}

/// Average BOM lead time in days; zero for an empty BOM.
pub fn average_lead_time(bom: &[BomItem]) -> f64 {
    if bom.is_empty() {
        return 0.0;
    }
    let sum: f64 = bom.iter().map(|b| finite_or_zero(b.lead_time_days)).sum();
    sum / bom.len() as f64
}

/// Weighted sum of four capped factors. Only lead-time risk is derived from
/// data (average lead time relative to the configured horizon); the other
/// three are fixed heuristic scores.
pub fn composite_risk(bom: &[BomItem], w: &RiskWeights) -> RiskScore {
    let lead_ratio = finite_or_zero(average_lead_time(bom) / w.lead_time_horizon_days);
    let breakdown = vec![
        RiskFactor {
            factor: RiskFactorKind::SupplierConcentration,
            score: (w.supplier_concentration_pct / 100.0 * w.supplier_concentration_max)
                .min(w.supplier_concentration_max),
            max: w.supplier_concentration_max,
        },
        RiskFactor {
            factor: RiskFactorKind::LeadTimeVariability,
            score: (lead_ratio * w.lead_time_max).min(w.lead_time_max),
            max: w.lead_time_max,
        },
        RiskFactor {
            factor: RiskFactorKind::GeographicExposure,
            score: w.geographic_score.min(w.geographic_max),
            max: w.geographic_max,
        },
        RiskFactor {
            factor: RiskFactorKind::StockoutRisk,
            score: w.stockout_score.min(w.stockout_max),
            max: w.stockout_max,
        },
    ];
    RiskScore {
        total: breakdown.iter().map(|f| f.score).sum(),
        breakdown,
    }
}
