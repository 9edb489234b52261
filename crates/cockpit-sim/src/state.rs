//! Simulator UI state.
//!
//! The slider values and the save dialog are owned by [`SimulatorState`]
//! and only change through [`SimulatorState::reduce`]. A failed save leaves
//! the parameters untouched and keeps the dialog open.

use crate::engine::Simulation;
use crate::params::SimParams;
use cockpit_core::{NewScenario, Scenario};
use serde::{Deserialize, Serialize};

/// Bounds and granularity of one slider, in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl SliderRange {
    /// Snap to the nearest step (measured from `min`) and clamp to range.
    pub fn snap(&self, value: f64) -> f64 {
        let steps = ((value - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

pub const PRODUCTION_SLIDER: SliderRange = SliderRange {
    min: -30.0,
    max: 50.0,
    step: 5.0,
};
pub const LEAD_TIME_SLIDER: SliderRange = SliderRange {
    min: -30.0,
    max: 100.0,
    step: 5.0,
};
pub const SAFETY_STOCK_SLIDER: SliderRange = SliderRange {
    min: -50.0,
    max: 100.0,
    step: 10.0,
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveDialog {
    pub open: bool,
    pub name: String,
    pub notes: String,
    /// A save request is in flight.
    pub saving: bool,
    pub last_error: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatorState {
    pub params: SimParams,
    pub dialog: SaveDialog,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SimulatorAction {
    SetProductionDelta(f64),
    SetLeadTimeVariance(f64),
    SetSafetyStockAdj(f64),
    /// Back to the identity scenario.
    Reset,
    /// Load saved values exactly, bypassing slider snapping.
    LoadScenario(SimParams),
    OpenSaveDialog,
    CloseSaveDialog,
    SetScenarioName(String),
    SetScenarioNotes(String),
    SaveStarted,
    SaveSucceeded,
    SaveFailed(String),
}

impl SimulatorAction {
    pub fn load(scenario: &Scenario) -> Self {
        SimulatorAction::LoadScenario(SimParams::from_scenario(scenario))
    }
}

fn slide(current: f64, range: &SliderRange, value: f64) -> f64 {
    if value.is_finite() {
        range.snap(value)
    } else {
        current
    }
}

impl SimulatorState {
    pub fn reduce(mut self, action: SimulatorAction) -> Self {
        use SimulatorAction::*;
        match action {
            SetProductionDelta(v) => {
                self.params.production_delta =
                    slide(self.params.production_delta, &PRODUCTION_SLIDER, v)
            }
            SetLeadTimeVariance(v) => {
                self.params.lead_time_variance =
                    slide(self.params.lead_time_variance, &LEAD_TIME_SLIDER, v)
            }
            SetSafetyStockAdj(v) => {
                self.params.safety_stock_adj =
                    slide(self.params.safety_stock_adj, &SAFETY_STOCK_SLIDER, v)
            }
            Reset => self.params = SimParams::default(),
            LoadScenario(p) => self.params = p,
            OpenSaveDialog => {
                self.dialog.open = true;
                self.dialog.last_error = None;
            }
            CloseSaveDialog => {
                if !self.dialog.saving {
                    self.dialog = SaveDialog::default();
                }
            }
            SetScenarioName(name) => self.dialog.name = name,
            SetScenarioNotes(notes) => self.dialog.notes = notes,
            SaveStarted => {
                self.dialog.saving = true;
                self.dialog.last_error = None;
            }
            SaveSucceeded => self.dialog = SaveDialog::default(),
            SaveFailed(err) => {
                self.dialog.saving = false;
                self.dialog.open = true;
                self.dialog.last_error = Some(err);
            }
        }
        self
    }

    /// Whether the save button is enabled.
    pub fn can_save(&self) -> bool {
        !self.dialog.saving && !self.dialog.name.trim().is_empty()
    }
}

/// Build the save request for the current dialog contents.
///
/// Returns `None` when the scenario name is blank.
pub fn prepare_save(
    state: &SimulatorState,
    sim: &Simulation,
    created_by: &str,
) -> Option<NewScenario> {
    let name = state.dialog.name.trim();
    if name.is_empty() {
        return None;
    }
    Some(NewScenario {
        scenario_name: name.to_string(),
        created_by: created_by.to_string(),
        production_delta_pct: state.params.production_delta,
        lead_time_variance_pct: state.params.lead_time_variance,
        safety_stock_adj_pct: state.params.safety_stock_adj,
        cash_impact_eur: sim.total_cash_impact,
        notes: state.dialog.notes.clone(),
    })
}

/// Newest scenarios first, at most `limit`. Ties keep their input order.
pub fn recent_scenarios(scenarios: &[Scenario], limit: usize) -> Vec<&Scenario> {
    let mut out: Vec<&Scenario> = scenarios.iter().collect();
    out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    out.truncate(limit);
    out
}
