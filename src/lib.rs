pub mod config;
pub mod enums;
pub mod error;
pub mod models;
pub mod db;
pub mod providers;
pub mod services;
pub mod alerts;
pub mod notifications;
pub mod scheduler;
pub mod api;

#[cfg(test)]
mod testing;

pub use config::Config;
pub use enums::{ AlertOperator, AlertType };
pub use error::{ AppError, Result };
pub use models::{ Alert, AlertProcessingMetrics, PortfolioSnapshot, RunOutcome };
