//! Weather source: OpenWeatherMap (live) and a seeded mock

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use rand::RngExt;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use super::{DataSourceAdapter, LiveSource, MockSource, SourceStrategy, seeded_rng};
use crate::config::WeatherConfig;
use crate::error::ProviderError;
use crate::models::{CurrentConditions, DailyForecast, MAX_FORECAST_DAYS, WeatherSnapshot};

pub type WeatherAdapter = DataSourceAdapter<WeatherQuery, WeatherSnapshot>;

#[derive(Debug, Clone, PartialEq)]
pub struct WeatherQuery {
    pub destination: String,
    /// Trip length; the forecast covers at most five of these days
    pub days: u32,
    /// First forecast day
    pub start: NaiveDate,
}

impl WeatherQuery {
    fn forecast_days(&self) -> usize {
        (self.days as usize).min(MAX_FORECAST_DAYS)
    }
}

/// Adapter with forecast capping applied to every answer
pub fn weather_adapter(strategy: SourceStrategy<WeatherQuery, WeatherSnapshot>) -> WeatherAdapter {
    DataSourceAdapter::new("weather", strategy).with_normalizer(WeatherSnapshot::capped)
}

/// Seeded synthetic weather
#[derive(Debug, Clone, Copy, Default)]
pub struct MockWeather;

const MOCK_CONDITIONS: [&str; 3] = ["sunny", "partly cloudy", "cloudy"];

impl MockSource<WeatherQuery, WeatherSnapshot> for MockWeather {
    fn generate(&self, query: &WeatherQuery) -> WeatherSnapshot {
        let mut rng = seeded_rng(&["weather", &query.destination]);
        let base_temp: f32 = rng.random_range(8.0..28.0);
        let base_temp = (base_temp * 10.0).round() / 10.0;

        let forecast = (0..query.forecast_days())
            .map(|i| {
                let variation = (i % 3) as f32 * 2.0;
                DailyForecast {
                    date: query.start + Duration::days(i as i64),
                    high: base_temp + variation + 4.0,
                    low: base_temp + variation - 4.0,
                    condition: MOCK_CONDITIONS[i % MOCK_CONDITIONS.len()].to_string(),
                }
            })
            .collect();

        WeatherSnapshot {
            current: CurrentConditions {
                temperature: base_temp + 0.5,
                condition: "partly cloudy".to_string(),
                humidity: rng.random_range(45..80),
            },
            forecast,
        }
    }
}

/// OpenWeatherMap current + 5 day / 3 hour forecast API
pub struct OpenWeatherMap {
    http: Client,
    api_key: String,
    base_url: String,
}

impl OpenWeatherMap {
    pub fn from_config(http: Client, config: &WeatherConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingCredential("weather.api_key".to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get<T>(&self, endpoint: &str, city: &str) -> Result<T, ProviderError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let url = format!(
            "{}/{}?q={}&appid={}&units=metric",
            self.base_url,
            endpoint,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key)
        );

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status("OpenWeatherMap", status, error_text));
        }

        response
            .json()
            .await
            .map_err(|e| {
                ProviderError::Parse(format!("Failed to parse OpenWeatherMap {endpoint} response: {e}"))
            })
    }
}

#[async_trait]
impl LiveSource<WeatherQuery, WeatherSnapshot> for OpenWeatherMap {
    fn name(&self) -> &str {
        "OpenWeatherMap"
    }

    #[instrument(name = "openweathermap_fetch", skip(self))]
    async fn fetch(&self, query: &WeatherQuery) -> Result<WeatherSnapshot, ProviderError> {
        let current: openweather::CurrentResponse = self.get("weather", &query.destination).await?;
        let forecast: openweather::ForecastResponse = self.get("forecast", &query.destination).await?;
        debug!(entries = forecast.list.len(), "Received OpenWeatherMap forecast");

        openweather::to_snapshot(current, forecast, query.forecast_days())
    }
}

/// OpenWeatherMap response structures and conversion
mod openweather {
    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        #[serde(default)]
        pub weather: Vec<Condition>,
        pub main: MainData,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub list: Vec<ForecastEntry>,
    }

    #[derive(Debug, Deserialize)]
    pub struct ForecastEntry {
        /// "2025-06-01 12:00:00"
        pub dt_txt: String,
        pub main: MainData,
        #[serde(default)]
        pub weather: Vec<Condition>,
    }

    #[derive(Debug, Deserialize)]
    pub struct MainData {
        pub temp: f32,
        pub temp_min: Option<f32>,
        pub temp_max: Option<f32>,
        pub humidity: Option<u8>,
    }

    #[derive(Debug, Deserialize)]
    pub struct Condition {
        pub description: String,
    }

    fn description(conditions: &[Condition]) -> String {
        conditions
            .first()
            .map_or_else(|| "unknown".to_string(), |c| c.description.clone())
    }

    /// Fold three-hourly entries into daily highs and lows
    pub fn to_snapshot(
        current: CurrentResponse,
        forecast: ForecastResponse,
        days: usize,
    ) -> Result<WeatherSnapshot, ProviderError> {
        let mut by_day: BTreeMap<NaiveDate, Vec<ForecastEntry>> = BTreeMap::new();
        for entry in forecast.list {
            let timestamp = NaiveDateTime::parse_from_str(&entry.dt_txt, "%Y-%m-%d %H:%M:%S")
                .map_err(|e| ProviderError::Parse(format!("Invalid forecast time '{}': {e}", entry.dt_txt)))?;
            by_day.entry(timestamp.date()).or_default().push(entry);
        }

        if by_day.is_empty() && days > 0 {
            return Err(ProviderError::Empty("OpenWeatherMap returned no forecast".to_string()));
        }

        let forecast = by_day
            .into_iter()
            .take(days)
            .map(|(date, entries)| {
                let high = entries
                    .iter()
                    .map(|e| e.main.temp_max.unwrap_or(e.main.temp))
                    .fold(f32::NEG_INFINITY, f32::max);
                let low = entries
                    .iter()
                    .map(|e| e.main.temp_min.unwrap_or(e.main.temp))
                    .fold(f32::INFINITY, f32::min);
                // Midday entry describes the day best
                let midday = &entries[entries.len() / 2];
                DailyForecast {
                    date,
                    high,
                    low,
                    condition: description(&midday.weather),
                }
            })
            .collect();

        Ok(WeatherSnapshot {
            current: CurrentConditions {
                temperature: current.main.temp,
                condition: description(&current.weather),
                humidity: current.main.humidity.unwrap_or(0),
            },
            forecast,
        })
    }
}
