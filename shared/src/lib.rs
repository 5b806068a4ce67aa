//! Shared types and alerting core for the Farming Master platform
//!
//! This crate contains the weather alert rule engine shared between the
//! backend and the browser (via WASM).

pub mod alerting;
pub mod error;
pub mod models;
pub mod thresholds;
pub mod types;
pub mod validation;

pub use alerting::*;
pub use error::*;
pub use models::*;
pub use thresholds::*;
pub use types::*;
pub use validation::*;
