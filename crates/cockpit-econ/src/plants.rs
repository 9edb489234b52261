//! Plant status classification by inventory value.

use crate::{quantile, EconError};
use cockpit_core::numeric::finite_or_zero;
use cockpit_core::DashboardData;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Number of Critical plants surfaced in the ranked list.
pub const CRITICAL_PLANT_LIMIT: usize = 5;
/// Number of Warning plants surfaced in the ranked list.
pub const WARNING_PLANT_LIMIT: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlantStatus {
    Critical,
    Warning,
    Normal,
}

/// A plant with its summed inventory value and status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantSummary {
    pub plant_id: String,
    pub plant_name: String,
    pub region: String,
    pub inventory_value: f64,
    pub status: PlantStatus,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub critical: usize,
    pub warning: usize,
    pub normal: usize,
}

impl StatusCounts {
    fn add(&mut self, status: PlantStatus) {
        match status {
            PlantStatus::Critical => self.critical += 1,
            PlantStatus::Warning => self.warning += 1,
            PlantStatus::Normal => self.normal += 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionStatus {
    pub region: String,
    pub counts: StatusCounts,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlantStatusReport {
    /// All plants in input order.
    pub plants: Vec<PlantSummary>,
    pub p50: f64,
    pub p75: f64,
    /// Critical plants, highest value first, truncated to [`CRITICAL_PLANT_LIMIT`].
    pub critical: Vec<PlantSummary>,
    /// Warning plants, highest value first, truncated to [`WARNING_PLANT_LIMIT`].
    pub warning: Vec<PlantSummary>,
    /// Counts for each requested region, in request order.
    pub regions: Vec<RegionStatus>,
    pub counts: StatusCounts,
}

/// Classify a value against the median and upper-quartile cut points.
/// Values exactly on a cut point fall to the lower category.
pub fn classify(value: f64, p50: f64, p75: f64) -> PlantStatus {
    if value > p75 {
        PlantStatus::Critical
    } else if value > p50 {
        PlantStatus::Warning
    } else {
        PlantStatus::Normal
    }
}

/// Sum inventory value per plant id. Rows for unknown plants are included.
pub fn plant_inventory_totals(data: &DashboardData) -> HashMap<&str, f64> {
    let mut totals: HashMap<&str, f64> = HashMap::new();
    for r in &data.inventory {
        *totals.entry(r.plant_id.as_str()).or_insert(0.0) += finite_or_zero(r.inventory_value_eur);
    }
    totals
}

fn ranked(plants: &[PlantSummary], status: PlantStatus, limit: usize) -> Vec<PlantSummary> {
    let mut out: Vec<PlantSummary> = plants
        .iter()
        .filter(|p| p.status == status)
        .cloned()
        .collect();
    out.sort_by(|a, b| b.inventory_value.total_cmp(&a.inventory_value));
    out.truncate(limit);
    out
}

/// Classify every plant as Critical (> p75), Warning (> p50) or Normal, with
/// quantiles taken over all plants' inventory totals.
pub fn classify_plants(
    data: &DashboardData,
    regions: &[String],
) -> Result<PlantStatusReport, EconError> {
    let totals = plant_inventory_totals(data);
    let values: Vec<f64> = data
        .plants
        .iter()
        .map(|p| totals.get(p.plant_id.as_str()).copied().unwrap_or(0.0))
        .collect();
    let p50 = quantile(&values, 0.50)?;
    let p75 = quantile(&values, 0.75)?;

    let plants: Vec<PlantSummary> = data
        .plants
        .iter()
        .zip(&values)
        .map(|(p, &value)| PlantSummary {
            plant_id: p.plant_id.clone(),
            plant_name: p.plant_name.clone(),
            region: p.region.clone(),
            inventory_value: value,
            status: classify(value, p50, p75),
        })
        .collect();

    let mut counts = StatusCounts::default();
    for p in &plants {
        counts.add(p.status);
    }
    let regions = regions
        .iter()
        .map(|region| {
            let mut rc = StatusCounts::default();
            for p in plants.iter().filter(|p| &p.region == region) {
                rc.add(p.status);
            }
            RegionStatus {
                region: region.clone(),
                counts: rc,
            }
        })
        .collect();

    debug!(p50, p75, ?counts, "classified plants");
    Ok(PlantStatusReport {
        critical: ranked(&plants, PlantStatus::Critical, CRITICAL_PLANT_LIMIT),
        warning: ranked(&plants, PlantStatus::Warning, WARNING_PLANT_LIMIT),
        plants,
        p50,
        p75,
        regions,
        counts,
    })
}
