//! Domain models for the Farming Master weather alerting core

mod advisory;
mod alert;
mod threshold;
mod weather;

pub use advisory::*;
pub use alert::*;
pub use threshold::*;
pub use weather::*;
