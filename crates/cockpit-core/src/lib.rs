#![deny(warnings)]

//! Core domain records and invariants for the manufacturing cockpit.
//!
//! The records mirror the rows served by the backend API (upper-snake-case
//! JSON keys). Every field is defaulted on decode so a partially populated row
//! still loads; [`validate_dashboard`] is the place where invariants are
//! checked, and callers decide whether a violation is fatal.

pub mod config;
pub mod format;
pub mod numeric;

pub use config::{CockpitConfig, OpportunityRates, RiskWeights, SimBaseline};

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Backend columns may hold SQL NULL; treat an explicit `null` like a
/// missing key.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A manufacturing site.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Plant {
    #[serde(deserialize_with = "nullable")]
    pub plant_id: String,
    #[serde(deserialize_with = "nullable")]
    pub plant_name: String,
    #[serde(deserialize_with = "nullable")]
    pub country: String,
    /// Sales region, e.g. "Europe" or "Asia-Pacific".
    #[serde(deserialize_with = "nullable")]
    pub region: String,
    #[serde(deserialize_with = "nullable")]
    pub latitude: f64,
    #[serde(deserialize_with = "nullable")]
    pub longitude: f64,
    #[serde(deserialize_with = "nullable")]
    pub specialization: String,
    #[serde(deserialize_with = "nullable")]
    pub capacity_units: f64,
    #[serde(deserialize_with = "nullable")]
    pub operational_status: String,
}

/// Criticality class of a bill-of-materials component.
///
/// Only `Critical` drives engine behavior; other labels are kept verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Criticality {
    Critical,
    High,
    Medium,
    Low,
    Other(String),
}

impl Default for Criticality {
    fn default() -> Self {
        Criticality::Other(String::new())
    }
}

impl From<String> for Criticality {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Critical" => Criticality::Critical,
            "High" => Criticality::High,
            "Medium" => Criticality::Medium,
            "Low" => Criticality::Low,
            _ => Criticality::Other(s),
        }
    }
}

impl From<Criticality> for String {
    fn from(c: Criticality) -> Self {
        match c {
            Criticality::Critical => "Critical".to_string(),
            Criticality::High => "High".to_string(),
            Criticality::Medium => "Medium".to_string(),
            Criticality::Low => "Low".to_string(),
            Criticality::Other(s) => s,
        }
    }
}

/// Bill-of-materials master data for one component.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct BomItem {
    #[serde(deserialize_with = "nullable")]
    pub sku_code: String,
    #[serde(deserialize_with = "nullable")]
    pub sku_name: String,
    #[serde(deserialize_with = "nullable")]
    pub category: String,
    /// Product line the component is fitted to.
    #[serde(deserialize_with = "nullable")]
    pub vehicle_type: String,
    #[serde(deserialize_with = "nullable")]
    pub criticality: Criticality,
    #[serde(deserialize_with = "nullable")]
    pub unit_cost_eur: f64,
    /// Replenishment lead time in whole days.
    #[serde(deserialize_with = "nullable")]
    pub lead_time_days: f64,
    #[serde(deserialize_with = "nullable")]
    pub quantity_per_vehicle: f64,
    #[serde(deserialize_with = "nullable")]
    pub supplier_count: u32,
    #[serde(deserialize_with = "nullable")]
    pub weight_kg: f64,
}

impl BomItem {
    pub fn is_critical(&self) -> bool {
        self.criticality == Criticality::Critical
    }
}

/// Stock position of one SKU at one plant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct InventoryRecord {
    #[serde(deserialize_with = "nullable")]
    pub inventory_id: String,
    #[serde(deserialize_with = "nullable")]
    pub plant_id: String,
    #[serde(deserialize_with = "nullable")]
    pub sku_code: String,
    #[serde(deserialize_with = "nullable")]
    pub current_stock: f64,
    #[serde(deserialize_with = "nullable")]
    pub reorder_point: f64,
    #[serde(deserialize_with = "nullable")]
    pub max_stock: f64,
    #[serde(deserialize_with = "nullable")]
    pub inventory_value_eur: f64,
    pub last_movement_date: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub storage_location: String,
}

impl InventoryRecord {
    /// Units missing to reach the reorder point (negative when above it).
    pub fn shortfall(&self) -> f64 {
        self.reorder_point - self.current_stock
    }

    pub fn is_below_reorder_point(&self) -> bool {
        self.current_stock < self.reorder_point
    }
}

/// Monthly financial snapshot of a plant.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct FinancialRecord {
    #[serde(deserialize_with = "nullable")]
    pub financial_id: String,
    #[serde(deserialize_with = "nullable")]
    pub plant_id: String,
    #[serde(deserialize_with = "nullable")]
    pub fiscal_year: i32,
    #[serde(deserialize_with = "nullable")]
    pub fiscal_month: u32,
    #[serde(deserialize_with = "nullable")]
    pub hard_inventory_value_eur: f64,
    #[serde(deserialize_with = "nullable")]
    pub soft_inventory_value_eur: f64,
    #[serde(deserialize_with = "nullable")]
    pub cash_tied_eur: f64,
    #[serde(deserialize_with = "nullable")]
    pub inventory_turns: f64,
    #[serde(deserialize_with = "nullable")]
    pub carrying_cost_eur: f64,
}

/// Third-party logistics provider.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Provider {
    #[serde(deserialize_with = "nullable")]
    pub provider_id: String,
    #[serde(deserialize_with = "nullable")]
    pub provider_name: String,
    #[serde(deserialize_with = "nullable")]
    pub region: String,
    #[serde(deserialize_with = "nullable")]
    pub service_type: String,
    #[serde(deserialize_with = "nullable")]
    pub contract_value_eur: f64,
    /// Service score in [0, 100].
    #[serde(deserialize_with = "nullable")]
    pub performance_score: f64,
    #[serde(deserialize_with = "nullable")]
    pub plants_served: u32,
    #[serde(deserialize_with = "nullable")]
    pub contract_expiry: String,
}

impl Provider {
    /// Contract expiry as a calendar date. Accepts `YYYY-MM-DD` with an
    /// optional trailing time component.
    pub fn contract_expiry_date(&self) -> Option<NaiveDate> {
        let head = self.contract_expiry.get(..10)?;
        NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
    }
}

/// A saved simulator configuration as returned by the scenario store.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "SCREAMING_SNAKE_CASE")]
pub struct Scenario {
    #[serde(deserialize_with = "nullable")]
    pub scenario_id: String,
    #[serde(deserialize_with = "nullable")]
    pub scenario_name: String,
    #[serde(deserialize_with = "nullable")]
    pub created_by: String,
    #[serde(deserialize_with = "nullable")]
    pub created_at: String,
    #[serde(deserialize_with = "nullable")]
    pub production_delta_pct: f64,
    #[serde(deserialize_with = "nullable")]
    pub lead_time_variance_pct: f64,
    #[serde(deserialize_with = "nullable")]
    pub safety_stock_adj_pct: f64,
    #[serde(deserialize_with = "nullable")]
    pub cash_impact_eur: f64,
    #[serde(deserialize_with = "nullable")]
    pub notes: String,
}

/// Body of a scenario save request; the store assigns id and timestamp.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct NewScenario {
    pub scenario_name: String,
    pub created_by: String,
    pub production_delta_pct: f64,
    pub lead_time_variance_pct: f64,
    pub safety_stock_adj_pct: f64,
    pub cash_impact_eur: f64,
    pub notes: String,
}

impl NewScenario {
    /// Materialize into a stored scenario.
    pub fn into_scenario(self, scenario_id: String, created_at: String) -> Scenario {
        Scenario {
            scenario_id,
            scenario_name: self.scenario_name,
            created_by: self.created_by,
            created_at,
            production_delta_pct: self.production_delta_pct,
            lead_time_variance_pct: self.lead_time_variance_pct,
            safety_stock_adj_pct: self.safety_stock_adj_pct,
            cash_impact_eur: self.cash_impact_eur,
            notes: self.notes,
        }
    }
}

/// Aggregate bundle served by `GET /api/dashboard`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardData {
    #[serde(deserialize_with = "nullable")]
    pub plants: Vec<Plant>,
    #[serde(deserialize_with = "nullable")]
    pub bom: Vec<BomItem>,
    #[serde(deserialize_with = "nullable")]
    pub inventory: Vec<InventoryRecord>,
    #[serde(deserialize_with = "nullable")]
    pub financials: Vec<FinancialRecord>,
    #[serde(deserialize_with = "nullable")]
    pub providers_3pl: Vec<Provider>,
    #[serde(deserialize_with = "nullable")]
    pub scenarios: Vec<Scenario>,
}

/// Errors raised while loading datasets or configuration files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("io error: {0}")]
    Io(String),
    #[error("parse error: {0}")]
    Parse(String),
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e.to_string())
    }
}

impl DashboardData {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        serde_json::from_str(text).map_err(|e| LoadError::Parse(e.to_string()))
    }

    /// Load a dashboard bundle previously exported as JSON.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Validation errors for record invariants.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    /// Identifier fields must not be blank.
    #[error("empty identifier in {0}")]
    EmptyIdentifier(&'static str),
    /// Stock figures must be non-negative.
    #[error("negative stock figure for sku {0}")]
    NegativeStock(String),
    /// Numeric field must be finite.
    #[error("non-finite value in {0}")]
    NonFinite(&'static str),
    /// Monetary values must be non-negative.
    #[error("negative monetary value in {0}")]
    NegativeMoney(&'static str),
    /// Performance score outside [0, 100].
    #[error("performance score out of range for provider {0}")]
    PerformanceOutOfRange(String),
    /// Duplicate key in a master-data collection.
    #[error("duplicate identifier: {0}")]
    DuplicateId(String),
}

fn ensure_finite(values: &[f64], field: &'static str) -> Result<(), ValidationError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ValidationError::NonFinite(field))
    }
}

pub fn validate_plant(p: &Plant) -> Result<(), ValidationError> {
    if p.plant_id.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier("plant"));
    }
    ensure_finite(&[p.capacity_units, p.latitude, p.longitude], "plant")
}

pub fn validate_bom_item(b: &BomItem) -> Result<(), ValidationError> {
    if b.sku_code.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier("bom"));
    }
    ensure_finite(
        &[b.unit_cost_eur, b.lead_time_days, b.quantity_per_vehicle],
        "bom",
    )?;
    if b.unit_cost_eur < 0.0 {
        return Err(ValidationError::NegativeMoney("bom"));
    }
    Ok(())
}

/// Validate a stock row. Joins are not checked here; unresolved keys are a
/// data-quality concern, not an invariant violation.
pub fn validate_inventory(r: &InventoryRecord) -> Result<(), ValidationError> {
    if r.sku_code.trim().is_empty() || r.plant_id.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier("inventory"));
    }
    ensure_finite(
        &[
            r.current_stock,
            r.reorder_point,
            r.max_stock,
            r.inventory_value_eur,
        ],
        "inventory",
    )?;
    if r.current_stock < 0.0 || r.reorder_point < 0.0 || r.max_stock < 0.0 {
        return Err(ValidationError::NegativeStock(r.sku_code.clone()));
    }
    Ok(())
}

pub fn validate_financial(f: &FinancialRecord) -> Result<(), ValidationError> {
    ensure_finite(
        &[
            f.hard_inventory_value_eur,
            f.soft_inventory_value_eur,
            f.cash_tied_eur,
            f.inventory_turns,
            f.carrying_cost_eur,
        ],
        "financials",
    )
}

pub fn validate_provider(p: &Provider) -> Result<(), ValidationError> {
    if p.provider_id.trim().is_empty() {
        return Err(ValidationError::EmptyIdentifier("provider"));
    }
    ensure_finite(&[p.contract_value_eur, p.performance_score], "provider")?;
    if !(0.0..=100.0).contains(&p.performance_score) {
        return Err(ValidationError::PerformanceOutOfRange(p.provider_id.clone()));
    }
    if p.contract_value_eur < 0.0 {
        return Err(ValidationError::NegativeMoney("provider"));
    }
    Ok(())
}

/// Validate the whole bundle, including key uniqueness of master data.
pub fn validate_dashboard(data: &DashboardData) -> Result<(), ValidationError> {
    let mut plant_ids: BTreeSet<&str> = BTreeSet::new();
    for p in &data.plants {
        validate_plant(p)?;
        if !plant_ids.insert(p.plant_id.as_str()) {
            return Err(ValidationError::DuplicateId(p.plant_id.clone()));
        }
    }
    let mut skus: BTreeSet<&str> = BTreeSet::new();
    for b in &data.bom {
        validate_bom_item(b)?;
        if !skus.insert(b.sku_code.as_str()) {
            return Err(ValidationError::DuplicateId(b.sku_code.clone()));
        }
    }
    for r in &data.inventory {
        validate_inventory(r)?;
    }
    for f in &data.financials {
        validate_financial(f)?;
    }
    for p in &data.providers_3pl {
        validate_provider(p)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FIXTURE: &str = include_str!("../../../fixtures/dashboard.json");

    fn stock(current: f64, reorder: f64) -> InventoryRecord {
        InventoryRecord {
            inventory_id: "INV-1".to_string(),
            plant_id: "P001".to_string(),
            sku_code: "SKU-1".to_string(),
            current_stock: current,
            reorder_point: reorder,
            max_stock: reorder * 3.0,
            inventory_value_eur: 1_000.0,
            ..InventoryRecord::default()
        }
    }

    #[test]
    fn fixture_parses_and_validates() {
        let data = DashboardData::from_json_str(FIXTURE).unwrap();
        assert!(!data.plants.is_empty());
        assert!(!data.bom.is_empty());
        assert!(data.bom.iter().any(BomItem::is_critical));
        validate_dashboard(&data).unwrap();
    }

    #[test]
    fn criticality_roundtrips_unknown_labels() {
        let c: Criticality = serde_json::from_str("\"Strategic\"").unwrap();
        assert_eq!(c, Criticality::Other("Strategic".to_string()));
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"Strategic\"");
        let c: Criticality = serde_json::from_str("\"Critical\"").unwrap();
        assert_eq!(c, Criticality::Critical);
    }

    #[test]
    fn missing_keys_default() {
        let r: InventoryRecord =
            serde_json::from_str(r#"{"PLANT_ID":"P1","SKU_CODE":"S1","CURRENT_STOCK":4}"#)
                .unwrap();
        assert_eq!(r.current_stock, 4.0);
        assert_eq!(r.reorder_point, 0.0);
        assert!(r.last_movement_date.is_none());
    }

    #[test]
    fn explicit_nulls_fall_back_to_defaults() {
        let text = r#"{
            "plants": [{"PLANT_ID": "P1", "REGION": null, "CAPACITY_UNITS": null}],
            "bom": [{"SKU_CODE": "S1", "CRITICALITY": null, "SUPPLIER_COUNT": null}],
            "inventory": [{"PLANT_ID": "P1", "SKU_CODE": "S1", "CURRENT_STOCK": null}],
            "financials": [{"PLANT_ID": "P1", "CASH_TIED_EUR": null}],
            "providers_3pl": [{"PROVIDER_ID": "3PL-1", "CONTRACT_EXPIRY": null}],
            "scenarios": [{"SCENARIO_ID": "SCN-1", "NOTES": null, "CASH_IMPACT_EUR": null}]
        }"#;
        let data = DashboardData::from_json_str(text).unwrap();
        assert_eq!(data.plants[0].region, "");
        assert_eq!(data.plants[0].capacity_units, 0.0);
        assert_eq!(data.bom[0].supplier_count, 0);
        assert_eq!(data.bom[0].criticality, Criticality::default());
        assert_eq!(data.inventory[0].current_stock, 0.0);
        assert_eq!(data.financials[0].cash_tied_eur, 0.0);
        assert!(data.providers_3pl[0].contract_expiry_date().is_none());
        assert_eq!(data.scenarios[0].notes, "");
        assert_eq!(data.scenarios[0].cash_impact_eur, 0.0);
        validate_dashboard(&data).unwrap();

        let empty = DashboardData::from_json_str(r#"{"scenarios": null}"#).unwrap();
        assert!(empty.scenarios.is_empty());
    }

    #[test]
    fn new_scenario_serializes_upper_snake_case() {
        let s = NewScenario {
            scenario_name: "Ramp".to_string(),
            created_by: "User".to_string(),
            production_delta_pct: 10.0,
            ..NewScenario::default()
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["SCENARIO_NAME"], "Ramp");
        assert_eq!(v["PRODUCTION_DELTA_PCT"], 10.0);
        assert!(v.get("SCENARIO_ID").is_none());
    }

    #[test]
    fn negative_stock_rejected() {
        assert_eq!(
            validate_inventory(&stock(-1.0, 10.0)),
            Err(ValidationError::NegativeStock("SKU-1".to_string()))
        );
        assert!(validate_inventory(&stock(5.0, f64::NAN)).is_err());
    }

    #[test]
    fn provider_score_bounds() {
        let mut p = Provider {
            provider_id: "3PL-1".to_string(),
            performance_score: 101.0,
            ..Provider::default()
        };
        assert!(validate_provider(&p).is_err());
        p.performance_score = 100.0;
        assert!(validate_provider(&p).is_ok());
    }

    #[test]
    fn duplicate_plant_rejected() {
        let plant = Plant {
            plant_id: "P001".to_string(),
            ..Plant::default()
        };
        let data = DashboardData {
            plants: vec![plant.clone(), plant],
            ..DashboardData::default()
        };
        assert_eq!(
            validate_dashboard(&data),
            Err(ValidationError::DuplicateId("P001".to_string()))
        );
    }

    #[test]
    fn contract_expiry_parsing() {
        let mut p = Provider {
            contract_expiry: "2026-03-31T00:00:00".to_string(),
            ..Provider::default()
        };
        assert_eq!(
            p.contract_expiry_date(),
            NaiveDate::from_ymd_opt(2026, 3, 31)
        );
        p.contract_expiry = "soon".to_string();
        assert!(p.contract_expiry_date().is_none());
    }

    proptest! {
        #[test]
        fn non_negative_stock_is_valid(current in 0.0f64..1e9, reorder in 0.0f64..1e9) {
            prop_assert!(validate_inventory(&stock(current, reorder)).is_ok());
        }
    }
}
