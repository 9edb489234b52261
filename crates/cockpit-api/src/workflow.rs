//! Scenario save flow driving the simulator state.

use crate::store::ScenarioStore;
use cockpit_core::Scenario;
use cockpit_sim::{prepare_save, Simulation, SimulatorAction, SimulatorState};
use tracing::{info, warn};

const NAME_REQUIRED: &str = "Scenario name is required";

/// Save the current scenario through `store`.
///
/// On success the dialog closes; on failure the error is recorded on the
/// still-open dialog and the parameters stay as they were.
pub async fn save_scenario<S: ScenarioStore + ?Sized>(
    store: &S,
    state: SimulatorState,
    sim: &Simulation,
    created_by: &str,
) -> (SimulatorState, Option<Scenario>) {
    let Some(req) = prepare_save(&state, sim, created_by) else {
        let refused = state.reduce(SimulatorAction::SaveFailed(NAME_REQUIRED.into()));
        return (refused, None);
    };
    let state = state.reduce(SimulatorAction::SaveStarted);
    match store.save(req).await {
        Ok(saved) => {
            info!(id = %saved.scenario_id, "scenario saved");
            (state.reduce(SimulatorAction::SaveSucceeded), Some(saved))
        }
        Err(e) => {
            warn!(error = %e, "scenario save failed");
            let failed = state.reduce(SimulatorAction::SaveFailed(e.to_string()));
            (failed, None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryScenarioStore;
    use cockpit_core::SimBaseline;
    use cockpit_sim::{simulate, SaveDialog};

    fn ready_state(name: &str) -> SimulatorState {
        [
            SimulatorAction::SetProductionDelta(15.0),
            SimulatorAction::SetSafetyStockAdj(20.0),
            SimulatorAction::OpenSaveDialog,
            SimulatorAction::SetScenarioName(name.into()),
            SimulatorAction::SetScenarioNotes("peak season".into()),
        ]
        .into_iter()
        .fold(SimulatorState::default(), SimulatorState::reduce)
    }

    fn sim_for(state: &SimulatorState) -> Simulation {
        simulate(state.params, &[], &SimBaseline::default()).unwrap()
    }

    #[tokio::test]
    async fn successful_save_closes_dialog() {
        let store = MemoryScenarioStore::new();
        let state = ready_state("Summer peak");
        let sim = sim_for(&state);
        let (state, saved) = save_scenario(&store, state, &sim, "planner").await;
        let saved = saved.unwrap();
        assert_eq!(saved.scenario_name, "Summer peak");
        assert_eq!(saved.production_delta_pct, 15.0);
        assert_eq!(saved.cash_impact_eur, sim.total_cash_impact);
        assert_eq!(state.dialog, SaveDialog::default());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failed_save_keeps_dialog_open() {
        let store = MemoryScenarioStore::new().rejecting("backend unavailable");
        let state = ready_state("Summer peak");
        let sim = sim_for(&state);
        let params = state.params;
        let (state, saved) = save_scenario(&store, state, &sim, "planner").await;
        assert!(saved.is_none());
        assert!(state.dialog.open);
        assert!(!state.dialog.saving);
        assert_eq!(state.dialog.name, "Summer peak");
        let error = state.dialog.last_error.unwrap();
        assert!(error.contains("backend unavailable"));
        assert_eq!(state.params, params);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_name_never_reaches_store() {
        let store = MemoryScenarioStore::new();
        let state = ready_state("");
        let sim = sim_for(&state);
        let (state, saved) = save_scenario(&store, state, &sim, "planner").await;
        assert!(saved.is_none());
        assert_eq!(state.dialog.last_error.as_deref(), Some(NAME_REQUIRED));
        assert!(store.list().await.unwrap().is_empty());
    }
}
