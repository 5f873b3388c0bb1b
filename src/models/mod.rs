//! Data models for the trip planner
//!
//! This module contains the core domain models organized by concern:
//! - Request: validated trip parameters
//! - Weather: current conditions and a short forecast
//! - Travel: flight and hotel options with ranking rules
//! - Attraction: points of interest and day plans
//! - Plan: the assembled travel plan and its provenance

pub mod attraction;
pub mod plan;
pub mod request;
pub mod travel;
pub mod weather;

// Re-export all public types for convenient access
pub use attraction::{Attraction, AttractionCategory, DayPlan, DayTheme};
pub use plan::{DateWindow, PlanProvenance, Provenance, TravelPlan};
pub use request::{MAX_TRIP_DAYS, MIN_TRIP_DAYS, TripQuery, TripRequest};
pub use travel::{
    FlightOption, HotelOption, MAX_FLIGHT_OPTIONS, MAX_HOTEL_OPTIONS, rank_flights, rank_hotels,
};
pub use weather::{CurrentConditions, DailyForecast, MAX_FORECAST_DAYS, WeatherSnapshot};
