//! HTTP client for the cockpit REST backend.

use crate::chat::{ChatReply, ChatRequest, ChatTransport};
use crate::error::{ApiError, ApiResult};
use crate::store::ScenarioStore;
use async_trait::async_trait;
use cockpit_core::{
    CockpitConfig, DashboardData, FinancialRecord, InventoryRecord, NewScenario, Plant,
    Provider, Scenario,
};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone, Debug)]
pub struct CockpitClient {
    client: Client,
    base_url: String,
}

impl CockpitClient {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ApiError::Transport(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &CockpitConfig) -> ApiResult<Self> {
        Self::new(cfg.api_base.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn decode<T: DeserializeOwned>(resp: Response, path: &str) -> ApiResult<T> {
        let status = resp.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                context: path.to_string(),
            });
        }
        let body = resp.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        debug!(path, "GET");
        let resp = self.client.get(self.url(path)).send().await?;
        Self::decode(resp, path).await
    }

    /// Every collection in one request.
    pub async fn fetch_dashboard(&self) -> ApiResult<DashboardData> {
        let data: DashboardData = self.get_json("/api/dashboard").await?;
        info!(
            plants = data.plants.len(),
            inventory = data.inventory.len(),
            "dashboard fetched"
        );
        Ok(data)
    }

    pub async fn fetch_plants(&self) -> ApiResult<Vec<Plant>> {
        self.get_json("/api/plants").await
    }

    pub async fn fetch_inventory(&self) -> ApiResult<Vec<InventoryRecord>> {
        self.get_json("/api/inventory").await
    }

    pub async fn fetch_financials(&self) -> ApiResult<Vec<FinancialRecord>> {
        self.get_json("/api/financials").await
    }

    pub async fn fetch_providers(&self) -> ApiResult<Vec<Provider>> {
        self.get_json("/api/providers").await
    }

    pub async fn fetch_scenarios(&self) -> ApiResult<Vec<Scenario>> {
        self.get_json("/api/scenarios").await
    }

    pub async fn save_scenario(&self, req: &NewScenario) -> ApiResult<Scenario> {
        let path = "/api/scenarios";
        let resp = self.client.post(self.url(path)).json(req).send().await?;
        let saved: Scenario = Self::decode(resp, path).await?;
        info!(id = %saved.scenario_id, name = %saved.scenario_name, "scenario saved");
        Ok(saved)
    }

    pub async fn chat(&self, req: &ChatRequest) -> ApiResult<ChatReply> {
        let path = "/api/agent/chat";
        let resp = self.client.post(self.url(path)).json(req).send().await?;
        Self::decode(resp, path).await
    }
}

#[async_trait]
impl ScenarioStore for CockpitClient {
    async fn list(&self) -> ApiResult<Vec<Scenario>> {
        self.fetch_scenarios().await
    }

    async fn save(&self, req: NewScenario) -> ApiResult<Scenario> {
        self.save_scenario(&req).await
    }
}

#[async_trait]
impl ChatTransport for CockpitClient {
    async fn send(&self, req: ChatRequest) -> ApiResult<ChatReply> {
        self.chat(&req).await
    }
}
