//! Trip planning orchestration
//!
//! [`TripPlanner`] owns one adapter per data domain plus the narrative
//! generator, all chosen at construction. A run suggests date windows, then
//! queries the narrative and the four sources concurrently and merges the
//! answers into one [`TravelPlan`].

use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use reqwest::Client;
use tracing::{info, instrument, warn};

use crate::config::TravelPlannerConfig;
use crate::dates::DateRangeSuggester;
use crate::error::ProviderError;
use crate::itinerary;
use crate::llm::{GeminiClient, LanguageModel};
use crate::models::{
    Attraction, DateWindow, FlightOption, HotelOption, PlanProvenance, TravelPlan, TripQuery, TripRequest,
    WeatherSnapshot,
};
use crate::narrative::NarrativeGenerator;
use crate::sources::flights::{KiwiTequila, MockFlights, flight_adapter};
use crate::sources::google_places::GooglePlacesClient;
use crate::sources::hotels::{GoogleHotels, MockHotels, hotel_adapter};
use crate::sources::places::{GooglePlaces, MockPlaces, places_adapter};
use crate::sources::weather::{MockWeather, OpenWeatherMap, weather_adapter};
use crate::sources::{
    FlightAdapter, FlightQuery, HotelAdapter, HotelQuery, LiveSource, PlacesAdapter, PlacesQuery,
    WeatherAdapter, WeatherQuery, select_strategy,
};
use crate::PlanningError;

/// Flights and hotels are searched for the first window at least this far out
const BOOKING_LEAD_DAYS: i64 = 2;

pub struct TripPlanner {
    suggester: DateRangeSuggester,
    narrator: NarrativeGenerator,
    weather: WeatherAdapter,
    flights: FlightAdapter,
    hotels: HotelAdapter,
    places: PlacesAdapter,
    reference_date: Option<NaiveDate>,
}

impl TripPlanner {
    pub fn new(
        narrator: NarrativeGenerator,
        weather: WeatherAdapter,
        flights: FlightAdapter,
        hotels: HotelAdapter,
        places: PlacesAdapter,
    ) -> Self {
        Self {
            suggester: DateRangeSuggester,
            narrator,
            weather,
            flights,
            hotels,
            places,
            reference_date: None,
        }
    }

    /// Plan relative to a fixed day instead of today
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Build every adapter from configuration
    ///
    /// Fails only when the configuration is invalid, or when
    /// `strict_credentials` is set and a live provider lacks its key.
    pub fn from_config(config: &TravelPlannerConfig) -> crate::Result<Self> {
        config.validate()?;

        let http = Client::builder()
            .user_agent(format!("travel-planner/{}", crate::VERSION))
            .build()
            .map_err(|e| PlanningError::configuration(format!("Failed to build HTTP client: {e}")))?;

        let providers = &config.providers;
        let use_mock = providers.use_mock_data;
        let strict = providers.strict_credentials;
        let timeout = providers.request_timeout();

        let live_weather: Result<Arc<dyn LiveSource<WeatherQuery, WeatherSnapshot>>, ProviderError> =
            OpenWeatherMap::from_config(http.clone(), &config.weather).map(|s| Arc::new(s) as _);
        let weather = weather_adapter(select_strategy(
            "weather",
            use_mock,
            strict,
            live_weather,
            Arc::new(MockWeather),
            timeout,
        )?);

        let live_flights: Result<Arc<dyn LiveSource<FlightQuery, Vec<FlightOption>>>, ProviderError> =
            KiwiTequila::from_config(http.clone(), &config.flights).map(|s| Arc::new(s) as _);
        let flights = flight_adapter(select_strategy(
            "flights",
            use_mock,
            strict,
            live_flights,
            Arc::new(MockFlights),
            timeout,
        )?);

        let live_hotels: Result<Arc<dyn LiveSource<HotelQuery, Vec<HotelOption>>>, ProviderError> =
            GooglePlacesClient::from_config(http.clone(), &config.places)
                .map(|client| Arc::new(GoogleHotels::new(client)) as _);
        let hotels = hotel_adapter(select_strategy(
            "hotels",
            use_mock,
            strict,
            live_hotels,
            Arc::new(MockHotels),
            timeout,
        )?);

        let live_places: Result<Arc<dyn LiveSource<PlacesQuery, Vec<Attraction>>>, ProviderError> =
            GooglePlacesClient::from_config(http.clone(), &config.places)
                .map(|client| Arc::new(GooglePlaces::new(client)) as _);
        let places = places_adapter(select_strategy(
            "places",
            use_mock,
            strict,
            live_places,
            Arc::new(MockPlaces),
            timeout,
        )?);

        // Mock data only replaces the four data sources; the narrative still
        // uses the model whenever a key is configured.
        let narrator = match GeminiClient::from_config(http, &config.llm) {
            Ok(client) => {
                let model: Arc<dyn LanguageModel> = Arc::new(client);
                NarrativeGenerator::new(model, config.llm.timeout())
            }
            Err(e) if strict && !use_mock => {
                return Err(PlanningError::configuration(format!(
                    "Language model unavailable: {e}"
                )));
            }
            Err(e) => {
                warn!(error = %e, "Language model not configured, using fallback narrative");
                NarrativeGenerator::fallback_only()
            }
        };

        info!(
            mock = use_mock,
            live_weather = weather.is_live(),
            live_flights = flights.is_live(),
            live_hotels = hotels.is_live(),
            live_places = places.is_live(),
            narrative_model = narrator.has_model(),
            "Trip planner ready"
        );

        Ok(Self::new(narrator, weather, flights, hotels, places))
    }

    /// Validate raw parameters, then plan
    ///
    /// Invalid input fails before any data source is contacted.
    pub async fn plan(&self, query: TripQuery) -> crate::Result<TravelPlan> {
        let request = TripRequest::try_from(query)?;
        self.run(request).await
    }

    /// Produce a complete plan for a validated request
    #[instrument(
        name = "plan_trip",
        skip(self, request),
        fields(destination = %request.destination(), origin = %request.origin(), days = request.days())
    )]
    pub async fn run(&self, request: TripRequest) -> crate::Result<TravelPlan> {
        let today = self.today();
        let month = request.month();
        let days = request.days();
        let destination = request.destination();

        let year = DateRangeSuggester::travel_year(today, month);
        let date_windows = self.suggester.suggest(year, month, days);
        let booking_window = best_window(&date_windows, today);
        info!(
            year,
            month = month.name(),
            window = %booking_window.label,
            "Planning trip"
        );

        let weather_query = WeatherQuery {
            destination: destination.to_string(),
            days,
            start: today,
        };
        let flight_query = FlightQuery::for_window(request.origin(), destination, booking_window);
        let hotel_query = HotelQuery::for_window(destination, booking_window);
        let places_query = PlacesQuery {
            destination: destination.to_string(),
            days,
        };

        let (narrative, weather, flights, hotels, places) = futures::join!(
            self.narrator.describe(destination),
            self.weather.fetch(&weather_query),
            self.flights.fetch(&flight_query),
            self.hotels.fetch(&hotel_query),
            self.places.fetch(&places_query),
        );

        let itinerary = itinerary::distribute(destination, places.value, days)?;

        let provenance = PlanProvenance {
            narrative: narrative.provenance,
            weather: weather.provenance,
            flights: flights.provenance,
            hotels: hotels.provenance,
            places: places.provenance,
        };
        info!(
            flights = flights.value.len(),
            hotels = hotels.value.len(),
            days = itinerary.len(),
            "Trip plan assembled"
        );

        Ok(TravelPlan::new(
            request,
            narrative.text,
            weather.value,
            date_windows,
            flights.value,
            hotels.value,
            itinerary,
            provenance,
        ))
    }

    fn today(&self) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

/// First window that still leaves time to book, else the latest one
fn best_window(windows: &[DateWindow; 3], today: NaiveDate) -> &DateWindow {
    let earliest_start = today + Duration::days(BOOKING_LEAD_DAYS);
    windows
        .iter()
        .find(|window| window.start_date >= earliest_start)
        .unwrap_or(&windows[2])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TravelPlannerConfig;
    use chrono::{Datelike, Month};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn mock_planner() -> TripPlanner {
        let mut config = TravelPlannerConfig::default();
        config.providers.use_mock_data = true;
        TripPlanner::from_config(&config)
            .unwrap()
            .with_reference_date(date(2025, 3, 10))
    }

    #[test]
    fn test_best_window_skips_windows_starting_too_soon() {
        let windows = DateRangeSuggester.suggest(2025, Month::June, 5);
        assert_eq!(best_window(&windows, date(2025, 3, 1)).label, "Early Month");
        assert_eq!(best_window(&windows, date(2025, 5, 31)).label, "Mid Month");
        assert_eq!(best_window(&windows, date(2025, 6, 25)).label, "Late Month");
    }

    #[tokio::test]
    async fn test_mock_planner_builds_complete_plan() {
        let request = TripRequest::new("Paris", "New York", 7, Month::June).unwrap();
        let plan = mock_planner().run(request).await.unwrap();

        assert_eq!(plan.itinerary().len(), 7);
        assert!(!plan.cultural_context().is_empty());
        assert!(plan.date_windows().iter().all(|w| w.start_date.year() == 2025));
        assert_eq!(plan.provenance().flights, crate::models::Provenance::Mock);
    }

    #[tokio::test]
    async fn test_strict_credentials_require_keys() {
        let mut config = TravelPlannerConfig::default();
        config.providers.strict_credentials = true;
        assert!(matches!(
            TripPlanner::from_config(&config),
            Err(PlanningError::Configuration { .. })
        ));
    }

    #[tokio::test]
    async fn test_missing_keys_degrade_to_mock() {
        let planner = TripPlanner::from_config(&TravelPlannerConfig::default()).unwrap();
        assert!(!planner.weather.is_live());
        assert!(!planner.places.is_live());
    }

    #[test]
    fn test_mock_data_keeps_configured_language_model() {
        let mut config = TravelPlannerConfig::default();
        config.providers.use_mock_data = true;
        config.llm.api_key = Some("test-key".to_string());

        let planner = TripPlanner::from_config(&config).unwrap();
        assert!(planner.narrator.has_model());
        assert!(!planner.flights.is_live());
        assert!(!planner.hotels.is_live());
    }

    #[test]
    fn test_mock_data_without_key_uses_fallback_narrative() {
        let mut config = TravelPlannerConfig::default();
        config.providers.use_mock_data = true;
        config.providers.strict_credentials = true;

        let planner = TripPlanner::from_config(&config).unwrap();
        assert!(!planner.narrator.has_model());
    }

    #[tokio::test]
    async fn test_invalid_query_is_rejected() {
        let query = TripQuery {
            destination: "Paris".to_string(),
            origin: "  ".to_string(),
            days: 3,
            month: Month::May,
        };
        assert!(matches!(
            mock_planner().plan(query).await,
            Err(PlanningError::Validation { .. })
        ));
    }
}
