//! Business logic services for the Farming Master server

pub mod advisory;
pub mod notification;
pub mod weather;

pub use advisory::{AdvisoryService, ArticleService};
pub use notification::{Notification, NotificationService};
pub use weather::{Reevaluation, WeatherService, WeatherUpdate};
