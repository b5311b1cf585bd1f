pub mod context;
pub mod orchestrator;

pub use crate::domain::model::{AgentResult, Itinerary, TripRequest};
pub use crate::domain::ports::{CompletionParams, ModelClient, Storage};
pub use crate::utils::error::Result;
