//! Production, cash-flow and component projection.

use crate::params::SimParams;
use crate::SimError;
use cockpit_core::numeric::round_half_up;
use cockpit_core::{BomItem, SimBaseline};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use tracing::{debug, warn};

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Rows shown in the component impact table.
pub const DEFAULT_TOP_COMPONENTS: usize = 10;

/// Amplitude of the sinusoidal production seasonality.
const SEASONAL_AMPLITUDE: f64 = 0.1;
/// Lead times are converted to months of demand on a 30-day basis.
const DAYS_PER_MONTH: f64 = 30.0;

const HIGH_RISK_LEAD_DAYS: f64 = 100.0;
const MEDIUM_RISK_LEAD_DAYS: f64 = 60.0;
const HIGH_RISK_PRODUCTION_PCT: f64 = 20.0;
const MEDIUM_RISK_PRODUCTION_PCT: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentRisk {
    Low,
    Medium,
    High,
}

impl ComponentRisk {
    fn assess(lead_days: f64, production_pct: f64) -> Self {
        if lead_days > HIGH_RISK_LEAD_DAYS || production_pct > HIGH_RISK_PRODUCTION_PCT {
            ComponentRisk::High
        } else if lead_days > MEDIUM_RISK_LEAD_DAYS
            || production_pct > MEDIUM_RISK_PRODUCTION_PCT
        {
            ComponentRisk::Medium
        } else {
            ComponentRisk::Low
        }
    }
}

/// Units produced in a month, baseline vs. simulated.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductionPoint {
    pub month: String,
    pub baseline: i64,
    pub simulated: i64,
}

/// Cumulative cash tied up to and including a month.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CashFlowPoint {
    pub month: String,
    pub baseline: f64,
    pub simulated: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentImpact {
    pub sku_code: String,
    pub component: String,
    pub product_type: String,
    pub base_lead_days: f64,
    pub adjusted_lead_days: f64,
    /// Change in monthly demand, whole units.
    pub demand_delta: i64,
    pub base_inventory_value: f64,
    pub adjusted_inventory_value: f64,
    pub inventory_impact: f64,
    pub risk: ComponentRisk,
}

/// Full simulator output.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Simulation {
    /// Parameters actually used (after clamping).
    pub params: SimParams,
    pub base_annual_vehicles: i64,
    pub adjusted_annual_vehicles: i64,
    pub vehicle_delta: i64,
    /// Final cumulative simulated minus baseline cash tied; positive means
    /// more cash tied up.
    pub total_cash_impact: f64,
    pub base_doi: f64,
    pub adjusted_doi: f64,
    pub working_capital_impact: f64,
    pub production: Vec<ProductionPoint>,
    pub cash_flow: Vec<CashFlowPoint>,
    /// Critical components, largest inventory impact first.
    pub components: Vec<ComponentImpact>,
}

impl Simulation {
    /// The `n` components with the largest inventory impact.
    pub fn top_components(&self, n: usize) -> &[ComponentImpact] {
        &self.components[..n.min(self.components.len())]
    }
}

fn seasonality(month_index: usize) -> f64 {
    1.0 + ((month_index as f64 - 3.0) * PI / 6.0).sin() * SEASONAL_AMPLITUDE
}

fn component_impact(
    b: &BomItem,
    params: &SimParams,
    monthly_baseline: f64,
    monthly_adjusted: f64,
) -> ComponentImpact {
    let m = params.multipliers();
    let base_demand = b.quantity_per_vehicle * monthly_baseline;
    let adjusted_demand = b.quantity_per_vehicle * monthly_adjusted;
    let adjusted_lead = round_half_up(b.lead_time_days * m.lead_time);

    let base_value = base_demand * b.unit_cost_eur * (b.lead_time_days / DAYS_PER_MONTH);
    let adjusted_value =
        adjusted_demand * b.unit_cost_eur * (adjusted_lead / DAYS_PER_MONTH) * m.safety_stock;

    let mut impact = ComponentImpact {
        sku_code: b.sku_code.clone(),
        component: b.sku_name.clone(),
        product_type: b.vehicle_type.clone(),
        base_lead_days: b.lead_time_days,
        adjusted_lead_days: adjusted_lead,
        demand_delta: round_half_up(adjusted_demand - base_demand) as i64,
        base_inventory_value: base_value,
        adjusted_inventory_value: adjusted_value,
        inventory_impact: adjusted_value - base_value,
        risk: ComponentRisk::assess(adjusted_lead, params.production_delta),
    };
    let figures = [
        impact.base_lead_days,
        impact.adjusted_lead_days,
        impact.base_inventory_value,
        impact.adjusted_inventory_value,
        impact.inventory_impact,
    ];
    if figures.iter().any(|v| !v.is_finite()) {
        warn!(sku = %b.sku_code, "non-finite component figures, zeroed");
        impact.base_lead_days = 0.0;
        impact.adjusted_lead_days = 0.0;
        impact.base_inventory_value = 0.0;
        impact.adjusted_inventory_value = 0.0;
        impact.inventory_impact = 0.0;
        impact.demand_delta = 0;
    }
    impact
}

/// Run the scenario model.
///
/// Steps:
/// - scale annual volume by the production multiplier and spread it over
///   twelve months with a sinusoidal seasonality
/// - accumulate monthly carrying cost (fixed inventory carrying plus
///   production pipeline) for baseline and simulated volumes; the simulated
///   series also scales by the lead-time and safety-stock multipliers
/// - derive days of inventory, working-capital impact and the per-component
///   impact of every Critical BOM item
///
/// Non-finite parameters are rejected; finite ones are clamped to
/// [`MAX_ADJUSTMENT_PCT`](crate::MAX_ADJUSTMENT_PCT).
pub fn simulate(
    params: SimParams,
    bom: &[BomItem],
    baseline: &SimBaseline,
) -> Result<Simulation, SimError> {
    params.validate()?;
    let params = params.clamped();
    let m = params.multipliers();

    let base_annual = round_half_up(baseline.base_annual_vehicles);
    let adjusted_annual = round_half_up(baseline.base_annual_vehicles * m.production);
    let monthly_baseline = baseline.base_annual_vehicles / 12.0;
    let monthly_adjusted = adjusted_annual / 12.0;

    let production: Vec<ProductionPoint> = MONTH_LABELS
        .iter()
        .enumerate()
        .map(|(idx, month)| {
            let s = seasonality(idx);
            ProductionPoint {
                month: month.to_string(),
                baseline: round_half_up(monthly_baseline * s) as i64,
                simulated: round_half_up(monthly_adjusted * s) as i64,
            }
        })
        .collect();

    let fixed_carrying = baseline.base_monthly_inventory_value * baseline.carrying_rate / 12.0;
    let unit_pipeline_cost = baseline.component_cost_per_vehicle * baseline.production_cost_share;
    let mut cumulative_base = 0.0;
    let mut cumulative_adjusted = 0.0;
    let cash_flow: Vec<CashFlowPoint> = production
        .iter()
        .map(|p| {
            let base_month = fixed_carrying + p.baseline as f64 * unit_pipeline_cost;
            let adjusted_month = fixed_carrying * m.lead_time * m.safety_stock
                + p.simulated as f64 * unit_pipeline_cost * m.lead_time;
            cumulative_base += base_month;
            cumulative_adjusted += adjusted_month;
            CashFlowPoint {
                month: p.month.clone(),
                baseline: cumulative_base,
                simulated: cumulative_adjusted,
            }
        })
        .collect();

    let total_cash_impact = cumulative_adjusted - cumulative_base;
    let adjusted_doi = baseline.base_doi * m.lead_time * m.safety_stock;
    let working_capital_impact =
        total_cash_impact + baseline.base_monthly_inventory_value * (m.safety_stock - 1.0);

    let mut components: Vec<ComponentImpact> = bom
        .iter()
        .filter(|b| b.is_critical())
        .map(|b| component_impact(b, &params, monthly_baseline, monthly_adjusted))
        .collect();
    components.sort_by(|a, b| b.inventory_impact.total_cmp(&a.inventory_impact));

    debug!(
        ?params,
        adjusted_annual,
        total_cash_impact,
        components = components.len(),
        "simulation complete"
    );
    Ok(Simulation {
        params,
        base_annual_vehicles: base_annual as i64,
        adjusted_annual_vehicles: adjusted_annual as i64,
        vehicle_delta: (adjusted_annual - base_annual) as i64,
        total_cash_impact,
        base_doi: baseline.base_doi,
        adjusted_doi,
        working_capital_impact,
        production,
        cash_flow,
        components,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cockpit_core::{Criticality, DashboardData};
    use proptest::prelude::*;

    const FIXTURE: &str = include_str!("../../../fixtures/dashboard.json");

    fn critical(sku: &str, lead: f64, qty: f64, cost: f64) -> BomItem {
        BomItem {
            sku_code: sku.to_string(),
            sku_name: format!("Component {sku}"),
            vehicle_type: "Excavator".to_string(),
            criticality: Criticality::Critical,
            unit_cost_eur: cost,
            lead_time_days: lead,
            quantity_per_vehicle: qty,
            ..BomItem::default()
        }
    }

    fn sample_bom() -> Vec<BomItem> {
        vec![
            critical("A", 80.0, 2.0, 100.0),
            critical("B", 45.0, 4.0, 35.0),
            critical("C", 120.0, 1.0, 900.0),
            BomItem {
                sku_code: "N".to_string(),
                criticality: Criticality::Low,
                lead_time_days: 10.0,
                ..BomItem::default()
            },
        ]
    }

    fn run(pd: f64, lt: f64, ss: f64) -> Simulation {
        let base = SimBaseline::default();
        simulate(SimParams::new(pd, lt, ss), &sample_bom(), &base).unwrap()
    }

    fn assert_all_finite(sim: &Simulation) {
        let scalars = [
            sim.total_cash_impact,
            sim.adjusted_doi,
            sim.working_capital_impact,
        ];
        assert!(scalars.iter().all(|v| v.is_finite()));
        for p in &sim.cash_flow {
            assert!(p.baseline.is_finite() && p.simulated.is_finite());
        }
        for c in &sim.components {
            assert!(c.inventory_impact.is_finite() && c.adjusted_lead_days.is_finite());
        }
    }

    #[test]
    fn identity_scenario_has_no_impact() {
        let sim = run(0.0, 0.0, 0.0);
        assert_eq!(sim.adjusted_annual_vehicles, sim.base_annual_vehicles);
        assert_eq!(sim.vehicle_delta, 0);
        assert_eq!(sim.total_cash_impact, 0.0);
        assert_eq!(sim.adjusted_doi, sim.base_doi);
        assert_eq!(sim.working_capital_impact, 0.0);
        assert!(sim.components.iter().all(|c| c.inventory_impact == 0.0));
        assert!(sim.production.iter().all(|p| p.baseline == p.simulated));
    }

    #[test]
    fn single_component_end_to_end() {
        let bom = vec![critical("HP", 80.0, 2.0, 100.0)];
        let base = SimBaseline::default();
        let sim = simulate(SimParams::new(25.0, 30.0, 10.0), &bom, &base).unwrap();
        assert_eq!(sim.components.len(), 1);
        let c = &sim.components[0];
        assert_eq!(c.adjusted_lead_days, 104.0);
        assert_eq!(c.risk, ComponentRisk::High);
        assert!(c.inventory_impact > 0.0);
        assert_eq!(sim.adjusted_annual_vehicles, 10_625);
        assert!(sim.total_cash_impact > 0.0);
    }

    #[test]
    fn series_shapes() {
        let sim = run(10.0, 0.0, 0.0);
        assert_eq!(sim.production.len(), 12);
        assert_eq!(sim.cash_flow.len(), 12);
        assert_eq!(sim.production[0].month, "Jan");
        assert_eq!(sim.cash_flow[11].month, "Dec");
        // Seasonality peaks in July (index 6 -> sin(pi/2)).
        let peak = sim.production.iter().max_by_key(|p| p.baseline).unwrap();
        assert_eq!(peak.month, "Jul");
        // Cumulative series never decrease for non-negative monthly costs.
        for w in sim.cash_flow.windows(2) {
            assert!(w[1].baseline >= w[0].baseline);
        }
        let last = sim.cash_flow.last().unwrap();
        assert_eq!(sim.total_cash_impact, last.simulated - last.baseline);
    }

    #[test]
    fn risk_bands() {
        assert_eq!(ComponentRisk::assess(101.0, 0.0), ComponentRisk::High);
        assert_eq!(ComponentRisk::assess(100.0, 0.0), ComponentRisk::Medium);
        assert_eq!(ComponentRisk::assess(30.0, 25.0), ComponentRisk::High);
        assert_eq!(ComponentRisk::assess(61.0, 0.0), ComponentRisk::Medium);
        assert_eq!(ComponentRisk::assess(30.0, 15.0), ComponentRisk::Medium);
        assert_eq!(ComponentRisk::assess(60.0, 10.0), ComponentRisk::Low);
    }

    #[test]
    fn components_sorted_and_filtered() {
        let sim = run(20.0, 15.0, 10.0);
        assert_eq!(sim.components.len(), 3);
        for w in sim.components.windows(2) {
            assert!(w[0].inventory_impact >= w[1].inventory_impact);
        }
        assert_eq!(sim.top_components(2).len(), 2);
        assert_eq!(sim.top_components(DEFAULT_TOP_COMPONENTS).len(), 3);
    }

    #[test]
    fn safety_stock_drives_working_capital() {
        let sim = run(0.0, 0.0, 10.0);
        let expected_extra = SimBaseline::default().base_monthly_inventory_value * 0.1;
        let extra = sim.working_capital_impact - sim.total_cash_impact;
        assert!((extra - expected_extra).abs() < 1e-3);
        assert!((sim.adjusted_doi - 46.2).abs() < 1e-9);
    }

    #[test]
    fn degenerate_inputs_stay_finite() {
        assert_all_finite(&run(-100.0, -100.0, -100.0));
        assert_all_finite(&run(-250.0, -400.0, -180.0));
        assert_all_finite(&run(1e300, 1e300, -1e300));
        let bad = vec![critical("X", f64::INFINITY, 1.0, 10.0)];
        let base = SimBaseline::default();
        let sim = simulate(SimParams::new(5.0, 5.0, 5.0), &bad, &base).unwrap();
        assert_all_finite(&sim);
        assert_eq!(sim.components[0].inventory_impact, 0.0);
    }

    #[test]
    fn non_finite_params_rejected() {
        let err = simulate(
            SimParams::new(0.0, f64::NAN, 0.0),
            &sample_bom(),
            &SimBaseline::default(),
        )
        .unwrap_err();
        assert_eq!(err, SimError::NonFinite("lead_time_variance"));
    }

    #[test]
    fn fixture_components() {
        let data = DashboardData::from_json_str(FIXTURE).unwrap();
        let base = SimBaseline::default();
        let sim = simulate(SimParams::new(15.0, 10.0, 20.0), &data.bom, &base).unwrap();
        let critical = data.bom.iter().filter(|b| b.is_critical()).count();
        assert_eq!(sim.components.len(), critical);
        let json = serde_json::to_string(&sim).unwrap();
        assert!(json.contains("\"total_cash_impact\""));
    }

    proptest! {
        #[test]
        fn deterministic(pd in -50.0f64..100.0, lt in -50.0f64..100.0, ss in -50.0f64..100.0) {
            prop_assert_eq!(run(pd, lt, ss), run(pd, lt, ss));
        }

        #[test]
        fn production_monotonic(pd in -100.0f64..200.0, step in 0.0f64..50.0, lt in -30.0f64..100.0) {
            let lo = run(pd, lt, 0.0);
            let hi = run(pd + step, lt, 0.0);
            prop_assert!(hi.adjusted_annual_vehicles >= lo.adjusted_annual_vehicles);
        }

        #[test]
        fn any_finite_input_gives_finite_output(pd in -1e6f64..1e6, lt in -1e6f64..1e6, ss in -1e6f64..1e6) {
            let sim = run(pd, lt, ss);
            prop_assert!(sim.total_cash_impact.is_finite());
            prop_assert!(sim.working_capital_impact.is_finite());
            prop_assert!(sim.components.iter().all(|c| c.inventory_impact.is_finite()));
        }
    }
}
