//! `travel-planner` - multi-day trip planning
//!
//! Combines weather, flight, hotel and attraction data with a language
//! model's cultural narrative into a single day-by-day [`TravelPlan`].

pub mod cli;
pub mod config;
pub mod dates;
pub mod error;
pub mod format;
pub mod itinerary;
pub mod llm;
pub mod logging;
pub mod models;
pub mod narrative;
pub mod planner;
pub mod sources;

// Re-export core types for public API
pub use config::TravelPlannerConfig;
pub use dates::DateRangeSuggester;
pub use error::{PlanningError, ProviderError};
pub use format::PlanFormatter;
pub use models::{DayPlan, TravelPlan, TripQuery, TripRequest};
pub use narrative::NarrativeGenerator;
pub use planner::TripPlanner;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlanningError>;
