//! The assembled travel plan

use std::fmt::Display;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{DayPlan, FlightOption, HotelOption, TripRequest, WeatherSnapshot};

/// A candidate travel window within (or starting in) the requested month
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct DateWindow {
    /// e.g. "Early Month"
    pub label: String,
    pub start_date: NaiveDate,
    /// Inclusive last day of the trip
    pub end_date: NaiveDate,
}

impl DateWindow {
    /// Number of calendar days covered, both ends included
    #[must_use]
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    #[must_use]
    pub fn overlaps(&self, other: &DateWindow) -> bool {
        self.start_date <= other.end_date && other.start_date <= self.end_date
    }
}

/// Where a piece of plan data came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Answered by the live provider
    Live,
    /// Mock data was configured
    Mock,
    /// The live provider failed and a substitute was used
    Fallback,
}

impl Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::Live => write!(f, "Live data"),
            Provenance::Mock => write!(f, "Mock data"),
            Provenance::Fallback => write!(f, "Fallback (provider unavailable)"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanProvenance {
    pub narrative: Provenance,
    pub weather: Provenance,
    pub flights: Provenance,
    pub hotels: Provenance,
    pub places: Provenance,
}

/// Complete plan for one trip request
///
/// Built once by the planner; afterwards only readable.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TravelPlan {
    request: TripRequest,
    cultural_context: String,
    weather: WeatherSnapshot,
    date_windows: [DateWindow; 3],
    flights: Vec<FlightOption>,
    hotels: Vec<HotelOption>,
    itinerary: Vec<DayPlan>,
    provenance: PlanProvenance,
    generated_at: DateTime<Utc>,
}

impl TravelPlan {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        request: TripRequest,
        cultural_context: String,
        weather: WeatherSnapshot,
        date_windows: [DateWindow; 3],
        flights: Vec<FlightOption>,
        hotels: Vec<HotelOption>,
        itinerary: Vec<DayPlan>,
        provenance: PlanProvenance,
    ) -> Self {
        Self {
            request,
            cultural_context,
            weather,
            date_windows,
            flights,
            hotels,
            itinerary,
            provenance,
            generated_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn request(&self) -> &TripRequest {
        &self.request
    }

    #[must_use]
    pub fn cultural_context(&self) -> &str {
        &self.cultural_context
    }

    #[must_use]
    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    #[must_use]
    pub fn date_windows(&self) -> &[DateWindow; 3] {
        &self.date_windows
    }

    #[must_use]
    pub fn flights(&self) -> &[FlightOption] {
        &self.flights
    }

    #[must_use]
    pub fn hotels(&self) -> &[HotelOption] {
        &self.hotels
    }

    #[must_use]
    pub fn itinerary(&self) -> &[DayPlan] {
        &self.itinerary
    }

    #[must_use]
    pub fn provenance(&self) -> &PlanProvenance {
        &self.provenance
    }

    #[must_use]
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}
