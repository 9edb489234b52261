//! Scenario persistence behind a trait so the save flow can run without a
//! backend.

use crate::error::{ApiError, ApiResult};
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime};
use cockpit_core::{NewScenario, Scenario};
use tokio::sync::Mutex;
use tracing::debug;

#[async_trait]
pub trait ScenarioStore: Send + Sync {
    /// Saved scenarios, newest first.
    async fn list(&self) -> ApiResult<Vec<Scenario>>;
    /// Persist a scenario; the store assigns id and timestamp.
    async fn save(&self, req: NewScenario) -> ApiResult<Scenario>;
}

type Clock = Box<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Process-local store. Ids follow the backend's `SCN-YYYYMMDDHHMMSS`
/// scheme with a numeric suffix when two saves land in the same second.
pub struct MemoryScenarioStore {
    scenarios: Mutex<Vec<Scenario>>,
    clock: Clock,
    reject_with: Option<String>,
}

impl Default for MemoryScenarioStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScenarioStore {
    pub fn new() -> Self {
        Self::with_clock(|| Local::now().naive_local())
    }

    pub fn with_clock(clock: impl Fn() -> NaiveDateTime + Send + Sync + 'static) -> Self {
        Self {
            scenarios: Mutex::new(Vec::new()),
            clock: Box::new(clock),
            reject_with: None,
        }
    }

    /// Seed with existing scenarios (e.g. from a fixture).
    pub fn seeded(self, scenarios: Vec<Scenario>) -> Self {
        Self {
            scenarios: Mutex::new(scenarios),
            ..self
        }
    }

    /// Every save fails with `reason`; listing still works.
    pub fn rejecting(self, reason: impl Into<String>) -> Self {
        Self {
            reject_with: Some(reason.into()),
            ..self
        }
    }
}

fn unique_id(base: String, taken: &[Scenario]) -> String {
    let exists = |id: &str| taken.iter().any(|s| s.scenario_id == id);
    if !exists(&base) {
        return base;
    }
    (2..)
        .map(|n| format!("{base}-{n}"))
        .find(|id| !exists(id))
        .unwrap_or(base)
}

#[async_trait]
impl ScenarioStore for MemoryScenarioStore {
    async fn list(&self) -> ApiResult<Vec<Scenario>> {
        let mut out = self.scenarios.lock().await.clone();
        out.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(out)
    }

    async fn save(&self, req: NewScenario) -> ApiResult<Scenario> {
        if let Some(reason) = &self.reject_with {
            return Err(ApiError::Rejected(reason.clone()));
        }
        if req.scenario_name.trim().is_empty() {
            return Err(ApiError::Rejected("scenario name is required".into()));
        }
        let now = (self.clock)();
        let mut scenarios = self.scenarios.lock().await;
        let id = unique_id(now.format("SCN-%Y%m%d%H%M%S").to_string(), &scenarios);
        let saved = req.into_scenario(id, now.format("%Y-%m-%dT%H:%M:%S").to_string());
        debug!(id = %saved.scenario_id, "scenario stored in memory");
        scenarios.push(saved.clone());
        Ok(saved)
    }
}
