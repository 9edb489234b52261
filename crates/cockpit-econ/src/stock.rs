//! Critical-SKU shortages and stock-out horizon buckets.

use crate::join::{DatasetIndex, JoinedInventory};
use cockpit_core::InventoryRecord;
use serde::{Deserialize, Serialize};

/// Number of shortages surfaced on the command center.
pub const SHORTAGE_LIMIT: usize = 5;

/// A Critical component below its reorder point at one plant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shortage {
    pub plant_id: String,
    pub plant_name: Option<String>,
    pub sku_code: String,
    pub sku_name: Option<String>,
    pub current_stock: f64,
    pub reorder_point: f64,
    /// `reorder_point - current_stock`.
    pub shortfall: f64,
    /// How far below the reorder point, in percent of it.
    pub severity_pct: f64,
}

fn severity_pct(r: &InventoryRecord) -> f64 {
    if r.reorder_point > 0.0 {
        (100.0 - r.current_stock / r.reorder_point * 100.0).max(0.0)
    } else {
        0.0
    }
}

impl From<JoinedInventory<'_>> for Shortage {
    fn from(j: JoinedInventory<'_>) -> Self {
        let r = j.record;
        Self {
            plant_id: r.plant_id.clone(),
            plant_name: j.plant.map(|p| p.plant_name.clone()),
            sku_code: r.sku_code.clone(),
            sku_name: j.bom.map(|b| b.sku_name.clone()),
            current_stock: r.current_stock,
            reorder_point: r.reorder_point,
            shortfall: r.shortfall(),
            severity_pct: severity_pct(r),
        }
    }
}

/// Critical rows with stock below reorder point, largest shortfall first.
/// Ties keep input order.
pub fn critical_shortages(index: &DatasetIndex<'_>, limit: usize) -> Vec<Shortage> {
    let mut rows: Vec<JoinedInventory<'_>> = index
        .critical_inventory()
        .filter(|j| j.record.is_below_reorder_point())
        .collect();
    rows.sort_by(|a, b| b.record.shortfall().total_cmp(&a.record.shortfall()));
    rows.into_iter().take(limit).map(Shortage::from).collect()
}

/// Stock-out horizon bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StockoutHorizon {
    Days30,
    Days60,
    Days90,
}

impl StockoutHorizon {
    pub const ALL: [StockoutHorizon; 3] = [
        StockoutHorizon::Days30,
        StockoutHorizon::Days60,
        StockoutHorizon::Days90,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StockoutHorizon::Days30 => "30 Days",
            StockoutHorizon::Days60 => "60 Days",
            StockoutHorizon::Days90 => "90 Days",
        }
    }

    /// Bucket for a coverage figure; `None` at 90 days and beyond.
    pub fn for_coverage(coverage: f64) -> Option<Self> {
        if !coverage.is_finite() {
            None
        } else if coverage < 30.0 {
            Some(StockoutHorizon::Days30)
        } else if coverage < 60.0 {
            Some(StockoutHorizon::Days60)
        } else if coverage < 90.0 {
            Some(StockoutHorizon::Days90)
        } else {
            None
        }
    }
}

/// Days of coverage: current stock over a daily consumption estimate of
/// `reorder_point / 30`. `None` when the ratio is not finite (zero reorder
/// point).
pub fn coverage_days(r: &InventoryRecord) -> Option<f64> {
    let c = r.current_stock / (r.reorder_point / 30.0);
    c.is_finite().then_some(c)
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonCount {
    pub horizon: StockoutHorizon,
    pub count: usize,
}

/// Count Critical rows per stock-out horizon. Always returns the three
/// buckets in ascending order.
pub fn stockout_forecast(index: &DatasetIndex<'_>) -> Vec<HorizonCount> {
    let mut counts = [0usize; 3];
    for j in index.critical_inventory() {
        let coverage = coverage_days(j.record);
        if let Some(h) = coverage.and_then(StockoutHorizon::for_coverage) {
            counts[h as usize] += 1;
        }
    }
    StockoutHorizon::ALL
        .iter()
        .zip(counts)
        .map(|(&horizon, count)| HorizonCount { horizon, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cockpit_core::{BomItem, Criticality, DashboardData, Plant};

    fn critical(sku: &str) -> BomItem {
        BomItem {
            sku_code: sku.to_string(),
            sku_name: format!("Part {sku}"),
            criticality: Criticality::Critical,
            ..BomItem::default()
        }
    }

    fn row(plant: &str, sku: &str, current: f64, reorder: f64) -> InventoryRecord {
        InventoryRecord {
            plant_id: plant.to_string(),
            sku_code: sku.to_string(),
            current_stock: current,
            reorder_point: reorder,
            ..InventoryRecord::default()
        }
    }

    fn counts(data: &DashboardData) -> Vec<usize> {
        let idx = DatasetIndex::new(data);
        stockout_forecast(&idx).iter().map(|h| h.count).collect()
    }

    #[test]
    fn coverage_buckets() {
        let data = DashboardData {
            bom: vec![critical("C1")],
            // Coverage 15, 45, 60 and 150 days, then infinite and NaN.
            inventory: vec![
                row("P1", "C1", 5.0, 10.0),
                row("P1", "C1", 15.0, 10.0),
                row("P1", "C1", 20.0, 10.0),
                row("P1", "C1", 50.0, 10.0),
                row("P1", "C1", 10.0, 0.0),
                row("P1", "C1", 0.0, 0.0),
            ],
            ..DashboardData::default()
        };
        assert_eq!(counts(&data), vec![1, 1, 1]);
    }

    #[test]
    fn only_critical_rows_count() {
        let data = DashboardData {
            bom: vec![
                critical("C1"),
                BomItem {
                    sku_code: "L1".to_string(),
                    criticality: Criticality::Low,
                    ..BomItem::default()
                },
            ],
            inventory: vec![row("P1", "L1", 1.0, 10.0), row("P1", "X404", 1.0, 10.0)],
            ..DashboardData::default()
        };
        assert_eq!(counts(&data), vec![0, 0, 0]);
    }

    #[test]
    fn thirty_day_boundary_goes_to_sixty() {
        let bucket = StockoutHorizon::for_coverage;
        assert_eq!(bucket(29.999), Some(StockoutHorizon::Days30));
        assert_eq!(bucket(30.0), Some(StockoutHorizon::Days60));
        assert_eq!(bucket(90.0), None);
        assert_eq!(bucket(f64::NAN), None);
        assert_eq!(StockoutHorizon::Days30.label(), "30 Days");
    }

    #[test]
    fn shortages_ranked_by_shortfall() {
        let data = DashboardData {
            plants: vec![Plant {
                plant_id: "P1".to_string(),
                plant_name: "Berlin".to_string(),
                ..Plant::default()
            }],
            bom: vec![critical("C1"), critical("C2")],
            inventory: vec![
                row("P1", "C1", 8.0, 10.0),
                row("P1", "C2", 0.0, 50.0),
                row("P9", "C1", 20.0, 40.0),
                row("P1", "C2", 60.0, 50.0),
                row("P1", "C1", 10.0, 10.0),
            ],
            ..DashboardData::default()
        };
        let idx = DatasetIndex::new(&data);
        let s = critical_shortages(&idx, SHORTAGE_LIMIT);
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].shortfall, 50.0);
        assert_eq!(s[0].severity_pct, 100.0);
        assert_eq!(s[0].plant_name.as_deref(), Some("Berlin"));
        assert_eq!(s[1].shortfall, 20.0);
        assert!(s[1].plant_name.is_none());
        assert_eq!(s[2].shortfall, 2.0);
        assert!((s[2].severity_pct - 20.0).abs() < 1e-9);
        assert_eq!(critical_shortages(&idx, 1).len(), 1);
    }
}
