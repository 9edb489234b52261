#![deny(warnings)]

//! What-if simulator for production volume, lead time and safety stock.
//!
//! [`simulate`] projects a 12-month production series, a cumulative
//! cash-tied series and a per-component impact table from three percentage
//! adjustments over a fixed [`SimBaseline`](cockpit_core::SimBaseline). The
//! computation is pure: identical inputs reproduce identical outputs.
//!
//! [`state`] holds the simulator's UI state and its single update path.

pub mod engine;
pub mod params;
pub mod state;

pub use engine::{
    simulate, CashFlowPoint, ComponentImpact, ComponentRisk, ProductionPoint, Simulation,
    DEFAULT_TOP_COMPONENTS,
};
pub use params::{Multipliers, SimParams, MAX_ADJUSTMENT_PCT};
pub use state::{
    prepare_save, recent_scenarios, SaveDialog, SimulatorAction, SimulatorState, SliderRange,
    LEAD_TIME_SLIDER, PRODUCTION_SLIDER, SAFETY_STOCK_SLIDER,
};

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SimError {
    /// An adjustment percentage was NaN or infinite.
    #[error("non-finite simulation parameter: {0}")]
    NonFinite(&'static str),
}
