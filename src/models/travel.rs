//! Flight and hotel options with their ranking rules

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Number of flight options kept in a plan
pub const MAX_FLIGHT_OPTIONS: usize = 3;
/// Number of hotel options kept in a plan
pub const MAX_HOTEL_OPTIONS: usize = 5;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FlightOption {
    pub carrier: String,
    pub flight_number: String,
    /// Local departure time at the origin
    pub departure_time: NaiveDateTime,
    /// Local arrival time at the destination
    pub arrival_time: NaiveDateTime,
    pub price: f64,
    /// ISO 4217 currency code
    pub currency: String,
    pub stops: u8,
    pub booking_link: Option<String>,
}

impl FlightOption {
    /// Total time between departure and arrival
    #[must_use]
    pub fn travel_time(&self) -> Duration {
        self.arrival_time - self.departure_time
    }

    /// Format travel time as e.g. "7h 30m"
    #[must_use]
    pub fn format_travel_time(&self) -> String {
        let minutes = self.travel_time().num_minutes().max(0);
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HotelOption {
    pub name: String,
    /// Rating from 0.0 to 5.0
    pub rating: f32,
    pub price_per_night: f64,
    pub amenities: BTreeSet<String>,
}

/// Cheapest first; ties go to the shorter trip, then to the carrier name
fn compare_flights(a: &FlightOption, b: &FlightOption) -> Ordering {
    a.price
        .total_cmp(&b.price)
        .then_with(|| a.travel_time().cmp(&b.travel_time()))
        .then_with(|| a.carrier.cmp(&b.carrier))
}

/// Best rated first; ties go to the cheaper room
fn compare_hotels(a: &HotelOption, b: &HotelOption) -> Ordering {
    b.rating
        .total_cmp(&a.rating)
        .then_with(|| a.price_per_night.total_cmp(&b.price_per_night))
}

/// Sort flights by price and keep the top [`MAX_FLIGHT_OPTIONS`]
#[must_use]
pub fn rank_flights(mut flights: Vec<FlightOption>) -> Vec<FlightOption> {
    flights.sort_by(compare_flights);
    flights.truncate(MAX_FLIGHT_OPTIONS);
    flights
}

/// Sort hotels by rating and keep the top [`MAX_HOTEL_OPTIONS`]
#[must_use]
pub fn rank_hotels(mut hotels: Vec<HotelOption>) -> Vec<HotelOption> {
    hotels.sort_by(compare_hotels);
    hotels.truncate(MAX_HOTEL_OPTIONS);
    hotels
}
