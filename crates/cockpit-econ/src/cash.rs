//! Cash-release opportunity waterfall.
//!
//! The buckets are heuristic estimates expressed as fixed fractions of
//! aggregate totals, not measured or forecast values.

use cockpit_core::numeric::finite_or_zero;
use cockpit_core::{DashboardData, FinancialRecord, OpportunityRates, Provider};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpportunityKind {
    SlowMovingInventory,
    ExcessSafetyStock,
    SupplierConsolidation,
    LeadTimeReduction,
    Total,
}

impl OpportunityKind {
    pub fn label(self) -> &'static str {
        match self {
            OpportunityKind::SlowMovingInventory => "Slow-Moving Inventory",
            OpportunityKind::ExcessSafetyStock => "Excess Safety Stock",
            OpportunityKind::SupplierConsolidation => "Supplier Consolidation",
            OpportunityKind::LeadTimeReduction => "Lead Time Reduction",
            OpportunityKind::Total => "Total Opportunity",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Opportunity {
    pub kind: OpportunityKind,
    pub value: f64,
}

/// Sum of hard inventory value across all financial snapshots.
pub fn total_hard_inventory(financials: &[FinancialRecord]) -> f64 {
    financials
        .iter()
        .map(|f| finite_or_zero(f.hard_inventory_value_eur))
        .sum()
}

/// Sum of cash tied across all financial snapshots.
pub fn total_cash_tied(financials: &[FinancialRecord]) -> f64 {
    financials
        .iter()
        .map(|f| finite_or_zero(f.cash_tied_eur))
        .sum()
}

/// Total 3PL contract value.
pub fn total_contract_value(providers: &[Provider]) -> f64 {
    providers
        .iter()
        .map(|p| finite_or_zero(p.contract_value_eur))
        .sum()
}

/// Four opportunity buckets plus their total, in display order.
///
/// Slow-moving stock is estimated from the per-row inventory values; the
/// safety-stock and lead-time buckets from hard inventory in the financial
/// snapshots; supplier consolidation from 3PL contract spend.
pub fn cash_release_waterfall(data: &DashboardData, rates: &OpportunityRates) -> Vec<Opportunity> {
    let stock_value: f64 = data
        .inventory
        .iter()
        .map(|r| finite_or_zero(r.inventory_value_eur))
        .sum();
    let hard = total_hard_inventory(&data.financials);
    let spend = total_contract_value(&data.providers_3pl);

    let buckets = [
        (OpportunityKind::SlowMovingInventory, stock_value * rates.slow_moving),
        (OpportunityKind::ExcessSafetyStock, hard * rates.excess_safety_stock),
        (OpportunityKind::SupplierConsolidation, spend * rates.supplier_consolidation),
        (OpportunityKind::LeadTimeReduction, hard * rates.lead_time_reduction),
    ];
    let total: f64 = buckets.iter().map(|(_, v)| v).sum();
    buckets
        .into_iter()
        .chain(std::iter::once((OpportunityKind::Total, total)))
        .map(|(kind, value)| Opportunity { kind, value })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cockpit_core::InventoryRecord;

    #[test]
    fn fractions_of_totals() {
        let data = DashboardData {
            inventory: vec![
                InventoryRecord {
                    inventory_value_eur: 600.0,
                    ..InventoryRecord::default()
                },
                InventoryRecord {
                    inventory_value_eur: 400.0,
                    ..InventoryRecord::default()
                },
            ],
            financials: vec![FinancialRecord {
                hard_inventory_value_eur: 10_000.0,
                ..FinancialRecord::default()
            }],
            providers_3pl: vec![Provider {
                contract_value_eur: 5_000.0,
                ..Provider::default()
            }],
            ..DashboardData::default()
        };
        let w = cash_release_waterfall(&data, &OpportunityRates::default());
        let values: Vec<f64> = w.iter().map(|o| o.value).collect();
        let expected = [300.0, 1_200.0, 400.0, 500.0, 2_400.0];
        for (got, want) in values.iter().zip(expected) {
            assert!((got - want).abs() < 1e-9, "{got} != {want}");
        }
        assert_eq!(w[4].kind, OpportunityKind::Total);
        assert_eq!(w[0].kind.label(), "Slow-Moving Inventory");
    }

    #[test]
    fn empty_dataset_yields_zero_buckets() {
        let w = cash_release_waterfall(&DashboardData::default(), &OpportunityRates::default());
        assert_eq!(w.len(), 5);
        assert!(w.iter().all(|o| o.value == 0.0));
    }
}
