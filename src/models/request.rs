//! Trip request model and its validation

use chrono::Month;
use serde::{Deserialize, Serialize};

use crate::PlanningError;

/// Shortest trip the planner accepts
pub const MIN_TRIP_DAYS: u32 = 1;
/// Longest trip the planner accepts
pub const MAX_TRIP_DAYS: u32 = 30;

/// Raw trip parameters as collected from a user, not yet validated
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripQuery {
    pub destination: String,
    pub origin: String,
    pub days: u32,
    pub month: Month,
}

/// A validated trip request
///
/// Fields are only reachable through accessors so a `TripRequest` can never
/// hold an out-of-range value once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TripQuery", into = "TripQuery")]
pub struct TripRequest {
    destination: String,
    origin: String,
    days: u32,
    month: Month,
}

impl TripRequest {
    /// Validate and create a trip request
    pub fn new(
        destination: impl Into<String>,
        origin: impl Into<String>,
        days: u32,
        month: Month,
    ) -> crate::Result<Self> {
        let destination = destination.into().trim().to_string();
        let origin = origin.into().trim().to_string();

        if destination.is_empty() {
            return Err(PlanningError::validation("Destination cannot be empty"));
        }
        if origin.is_empty() {
            return Err(PlanningError::validation("Origin cannot be empty"));
        }
        if !(MIN_TRIP_DAYS..=MAX_TRIP_DAYS).contains(&days) {
            return Err(PlanningError::validation(format!(
                "Number of days must be between {MIN_TRIP_DAYS} and {MAX_TRIP_DAYS}, got {days}"
            )));
        }

        Ok(Self {
            destination,
            origin,
            days,
            month,
        })
    }

    #[must_use]
    pub fn destination(&self) -> &str {
        &self.destination
    }

    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    #[must_use]
    pub fn days(&self) -> u32 {
        self.days
    }

    #[must_use]
    pub fn month(&self) -> Month {
        self.month
    }
}

impl TryFrom<TripQuery> for TripRequest {
    type Error = PlanningError;

    fn try_from(query: TripQuery) -> Result<Self, Self::Error> {
        Self::new(query.destination, query.origin, query.days, query.month)
    }
}

impl From<TripRequest> for TripQuery {
    fn from(request: TripRequest) -> Self {
        Self {
            destination: request.destination,
            origin: request.origin,
            days: request.days,
            month: request.month,
        }
    }
}
