//! Hotel source: Google Places lodging search (live) and a seeded mock

use std::collections::BTreeSet;

use async_trait::async_trait;
use chrono::NaiveDate;
use rand::RngExt;
use tracing::instrument;

use super::google_places::{GooglePlacesClient, PlaceResult};
use super::{DataSourceAdapter, LiveSource, MockSource, SourceStrategy, seeded_rng};
use crate::error::ProviderError;
use crate::models::{DateWindow, HotelOption, rank_hotels};

pub type HotelAdapter = DataSourceAdapter<HotelQuery, Vec<HotelOption>>;

#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuery {
    pub destination: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl HotelQuery {
    pub fn for_window(destination: &str, window: &DateWindow) -> Self {
        Self {
            destination: destination.to_string(),
            check_in: window.start_date,
            check_out: window.end_date,
        }
    }
}

/// Adapter that always yields at most five hotels, best rated first
pub fn hotel_adapter(strategy: SourceStrategy<HotelQuery, Vec<HotelOption>>) -> HotelAdapter {
    DataSourceAdapter::new("hotels", strategy).with_normalizer(rank_hotels)
}

const HOTEL_CHAINS: [&str; 12] = [
    "Marriott",
    "Hilton",
    "Hyatt",
    "Radisson",
    "ITC Hotels",
    "Taj Hotels",
    "Oberoi Hotels",
    "Holiday Inn",
    "Sheraton",
    "The Leela",
    "AccorHotels",
    "Four Seasons",
];

const HOTEL_TYPES: [&str; 5] = ["Hotel", "Resort", "Hotel & Spa", "Boutique Hotel", "Business Hotel"];

const AMENITIES: [&str; 12] = [
    "Free WiFi",
    "Swimming Pool",
    "Fitness Center",
    "Spa",
    "Restaurant",
    "Bar",
    "Room Service",
    "Airport Shuttle",
    "Business Center",
    "Parking",
    "Laundry Service",
    "Concierge",
];

/// Seeded synthetic hotels; the same city and month give the same list
#[derive(Debug, Clone, Copy, Default)]
pub struct MockHotels;

impl MockSource<HotelQuery, Vec<HotelOption>> for MockHotels {
    fn generate(&self, query: &HotelQuery) -> Vec<HotelOption> {
        let month_key = query.check_in.format("%Y-%m").to_string();
        let mut rng = seeded_rng(&["hotels", &query.destination, &month_key]);
        let count = rng.random_range(8..=12);

        (0..count)
            .map(|_| {
                let rating: f32 = rng.random_range(3.0..=5.0);
                let rating = (rating * 10.0).round() / 10.0;
                let chain = HOTEL_CHAINS[rng.random_range(0..HOTEL_CHAINS.len())];
                let kind = HOTEL_TYPES[rng.random_range(0..HOTEL_TYPES.len())];
                let price_per_night =
                    50.0 + f64::from(rating) * 40.0 + f64::from(rng.random_range(-20..=50_i32));

                // Higher rated hotels list more amenities
                let amenity_count = (rating as usize * 2 + rng.random_range(3..=6)).min(AMENITIES.len());
                let offset = rng.random_range(0..AMENITIES.len());
                let amenities = AMENITIES
                    .iter()
                    .cycle()
                    .skip(offset)
                    .take(amenity_count)
                    .map(|a| (*a).to_string())
                    .collect();

                HotelOption {
                    name: format!("{chain} {} {kind}", query.destination),
                    rating,
                    price_per_night: (price_per_night * 100.0).round() / 100.0,
                    amenities,
                }
            })
            .collect()
    }
}

/// Lodging results from Google Places
pub struct GoogleHotels {
    client: GooglePlacesClient,
}

impl GoogleHotels {
    pub fn new(client: GooglePlacesClient) -> Self {
        Self { client }
    }
}

const DEFAULT_PRICE_LEVEL: u8 = 2;

/// Google only reports a 0-4 price level; turn it into a nightly estimate
fn estimated_nightly_price(price_level: Option<u8>) -> f64 {
    60.0 + 55.0 * f64::from(price_level.unwrap_or(DEFAULT_PRICE_LEVEL))
}

fn amenities_from_types(types: &[String]) -> BTreeSet<String> {
    types
        .iter()
        .filter_map(|t| match t.as_str() {
            "spa" => Some("Spa"),
            "restaurant" | "food" => Some("Restaurant"),
            "bar" | "night_club" => Some("Bar"),
            "gym" => Some("Fitness Center"),
            "parking" => Some("Parking"),
            _ => None,
        })
        .map(str::to_string)
        .collect()
}

fn to_hotel(place: PlaceResult) -> HotelOption {
    HotelOption {
        amenities: amenities_from_types(&place.types),
        price_per_night: estimated_nightly_price(place.price_level),
        rating: place.rating.unwrap_or(0.0).clamp(0.0, 5.0),
        name: place.name,
    }
}

#[async_trait]
impl LiveSource<HotelQuery, Vec<HotelOption>> for GoogleHotels {
    fn name(&self) -> &str {
        "Google Places (lodging)"
    }

    #[instrument(name = "google_hotels_fetch", skip(self))]
    async fn fetch(&self, query: &HotelQuery) -> Result<Vec<HotelOption>, ProviderError> {
        let results = self
            .client
            .text_search(&format!("hotels in {}", query.destination), Some("lodging"))
            .await?;

        let hotels: Vec<HotelOption> = results.into_iter().map(to_hotel).collect();
        if hotels.is_empty() {
            return Err(ProviderError::Empty(format!("No hotels found in {}", query.destination)));
        }
        Ok(hotels)
    }
}
