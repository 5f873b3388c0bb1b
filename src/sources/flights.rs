//! Flight source: Kiwi Tequila search (live) and a seeded mock

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::RngExt;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{DataSourceAdapter, LiveSource, MockSource, SourceStrategy, seeded_rng};
use crate::config::FlightsConfig;
use crate::error::ProviderError;
use crate::models::{DateWindow, FlightOption, rank_flights};

pub type FlightAdapter = DataSourceAdapter<FlightQuery, Vec<FlightOption>>;

#[derive(Debug, Clone, PartialEq)]
pub struct FlightQuery {
    pub origin: String,
    pub destination: String,
    pub origin_code: String,
    pub destination_code: String,
    pub departure: NaiveDate,
    pub return_date: NaiveDate,
}

impl FlightQuery {
    /// Round trip over the given window
    pub fn for_window(origin: &str, destination: &str, window: &DateWindow) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            origin_code: city_code(origin),
            destination_code: city_code(destination),
            departure: window.start_date,
            return_date: window.end_date,
        }
    }
}

const CITY_CODES: &[(&str, &str)] = &[
    ("new york", "NYC"),
    ("nyc", "NYC"),
    ("paris", "PAR"),
    ("london", "LON"),
    ("tokyo", "TYO"),
    ("los angeles", "LAX"),
    ("chicago", "CHI"),
    ("san francisco", "SFO"),
    ("miami", "MIA"),
    ("boston", "BOS"),
    ("seattle", "SEA"),
    ("rome", "ROM"),
    ("barcelona", "BCN"),
    ("amsterdam", "AMS"),
    ("dubai", "DXB"),
    ("singapore", "SIN"),
    ("hong kong", "HKG"),
    ("sydney", "SYD"),
    ("delhi", "DEL"),
    ("mumbai", "BOM"),
];

/// IATA city code for well-known cities, else the first three letters
#[must_use]
pub fn city_code(city: &str) -> String {
    let normalized = city.trim().to_lowercase();
    CITY_CODES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map_or_else(
            || normalized.chars().filter(|c| c.is_alphabetic()).take(3).collect::<String>().to_uppercase(),
            |(_, code)| (*code).to_string(),
        )
}

/// Adapter that always yields at most three flights, cheapest first
pub fn flight_adapter(strategy: SourceStrategy<FlightQuery, Vec<FlightOption>>) -> FlightAdapter {
    DataSourceAdapter::new("flights", strategy).with_normalizer(rank_flights)
}

/// Seeded synthetic flights
///
/// Carriers and fares depend on the route and travel month only; the window
/// just places the departures on its first day.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockFlights;

const MOCK_CARRIERS: [(&str, &str); 4] = [
    ("AirFly", "AF"),
    ("SkyConnect", "SC"),
    ("Cloudline", "CL"),
    ("Meridian Air", "MA"),
];
const MOCK_FLIGHT_COUNT: u32 = 5;

impl MockSource<FlightQuery, Vec<FlightOption>> for MockFlights {
    fn generate(&self, query: &FlightQuery) -> Vec<FlightOption> {
        let month_key = query.departure.format("%Y-%m").to_string();
        let mut rng = seeded_rng(&["flights", &query.origin, &query.destination, &month_key]);

        (0..MOCK_FLIGHT_COUNT)
            .map(|i| {
                let (carrier, prefix) = MOCK_CARRIERS[rng.random_range(0..MOCK_CARRIERS.len())];
                let stops: u8 = [0, 0, 1][rng.random_range(0..3)];
                let hour = 6 + i * 3;
                let departure_time = query
                    .departure
                    .and_time(NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default());
                let duration = Duration::hours(6 + 2 * i64::from(stops));
                let price = f64::from(300 + rng.random_range(-100..=200_i32));

                FlightOption {
                    carrier: carrier.to_string(),
                    flight_number: format!("{prefix}{}", 1000 + i),
                    departure_time,
                    arrival_time: departure_time + duration,
                    price,
                    currency: "USD".to_string(),
                    stops,
                    booking_link: None,
                }
            })
            .collect()
    }
}

/// Kiwi.com Tequila flight search
pub struct KiwiTequila {
    http: Client,
    api_key: String,
    base_url: String,
    currency: String,
}

impl KiwiTequila {
    pub fn from_config(http: Client, config: &FlightsConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingCredential("flights.api_key".to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            currency: config.currency.clone(),
        })
    }
}

#[async_trait]
impl LiveSource<FlightQuery, Vec<FlightOption>> for KiwiTequila {
    fn name(&self) -> &str {
        "Kiwi Tequila"
    }

    #[instrument(
        name = "kiwi_search",
        skip(self),
        fields(from = %query.origin_code, to = %query.destination_code)
    )]
    async fn fetch(&self, query: &FlightQuery) -> Result<Vec<FlightOption>, ProviderError> {
        let departure = query.departure.format("%d/%m/%Y").to_string();
        let return_date = query.return_date.format("%d/%m/%Y").to_string();
        let url = format!(
            "{}/v2/search?fly_from={}&fly_to={}&date_from={departure}&date_to={departure}\
             &return_from={return_date}&return_to={return_date}&curr={}&limit=10",
            self.base_url,
            urlencoding::encode(&query.origin_code),
            urlencoding::encode(&query.destination_code),
            urlencoding::encode(&self.currency),
        );

        let response = self
            .http
            .get(&url)
            .header("apikey", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status("Kiwi", status, error_text));
        }

        let parsed: kiwi::SearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse Kiwi response: {e}")))?;
        debug!(results = parsed.data.len(), "Received Kiwi itineraries");

        kiwi::to_options(parsed)
    }
}

mod kiwi {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct SearchResponse {
        pub currency: Option<String>,
        #[serde(default)]
        pub data: Vec<Itinerary>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Itinerary {
        pub local_departure: String,
        pub local_arrival: String,
        pub price: f64,
        #[serde(default)]
        pub airlines: Vec<String>,
        #[serde(default)]
        pub route: Vec<Segment>,
        pub deep_link: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Segment {
        pub airline: Option<String>,
        pub flight_no: Option<u32>,
        /// 0 for the outbound leg, 1 for the return
        #[serde(default)]
        pub r#return: u8,
    }

    /// "2025-06-01T08:15:00.000Z"
    fn parse_local(raw: &str) -> Result<NaiveDateTime, ProviderError> {
        NaiveDateTime::parse_from_str(raw.trim_end_matches('Z'), "%Y-%m-%dT%H:%M:%S%.f")
            .map_err(|e| ProviderError::Parse(format!("Invalid Kiwi timestamp '{raw}': {e}")))
    }

    pub fn to_options(response: SearchResponse) -> Result<Vec<FlightOption>, ProviderError> {
        let currency = response.currency.unwrap_or_else(|| "USD".to_string());

        let options = response
            .data
            .into_iter()
            .map(|itinerary| {
                let outbound: Vec<&Segment> = itinerary.route.iter().filter(|s| s.r#return == 0).collect();
                let carrier = itinerary
                    .airlines
                    .first()
                    .cloned()
                    .or_else(|| outbound.first().and_then(|s| s.airline.clone()))
                    .unwrap_or_else(|| "Unknown".to_string());
                let flight_number = outbound
                    .first()
                    .and_then(|s| Some(format!("{}{}", s.airline.as_deref()?, s.flight_no?)))
                    .unwrap_or_else(|| carrier.clone());

                Ok(FlightOption {
                    carrier,
                    flight_number,
                    departure_time: parse_local(&itinerary.local_departure)?,
                    arrival_time: parse_local(&itinerary.local_arrival)?,
                    price: itinerary.price,
                    currency: currency.clone(),
                    stops: u8::try_from(outbound.len().saturating_sub(1)).unwrap_or(u8::MAX),
                    booking_link: itinerary.deep_link,
                })
            })
            .collect::<Result<Vec<_>, ProviderError>>()?;

        if options.is_empty() {
            return Err(ProviderError::Empty("Kiwi returned no itineraries".to_string()));
        }
        Ok(options)
    }
}
