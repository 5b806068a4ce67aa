//! HTTP request handlers

pub mod advisory;
pub mod health;
pub mod notification;
pub mod threshold;
pub mod weather;

pub use advisory::*;
pub use health::*;
pub use notification::*;
pub use threshold::*;
pub use weather::*;
