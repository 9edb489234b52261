#![deny(warnings)]

//! Cockpit REST client and the stateful flows built on it.
//!
//! [`CockpitClient`] talks to the backend; [`ScenarioStore`] and
//! [`ChatTransport`] abstract it so the save and chat flows also run
//! against [`MemoryScenarioStore`] and [`KeywordResponder`] offline.

pub mod chat;
pub mod client;
pub mod error;
pub mod store;
pub mod workflow;

pub use chat::{
    reveal_words, ChatMessage, ChatReply, ChatRequest, ChatSession, ChatSource, ChatTransport,
    KeywordResponder, MessageStatus, Role,
};
pub use client::CockpitClient;
pub use error::{ApiError, ApiResult};
pub use store::{MemoryScenarioStore, ScenarioStore};
pub use workflow::save_scenario;
