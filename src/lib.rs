pub mod agents;
pub mod config;
pub mod core;
pub mod domain;
pub mod providers;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::cli::LocalStorage;
pub use config::credentials::ApiCredentials;
pub use config::planner_config::PlannerConfig;
pub use core::orchestrator::AgentSequence;
pub use domain::model::{Itinerary, TravelStyle, TripRequest};
pub use utils::error::{PlannerError, Result};
