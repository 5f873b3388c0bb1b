//! Weather snapshot for a destination

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Maximum number of forecast days kept in a snapshot
pub const MAX_FORECAST_DAYS: usize = 5;

/// Current conditions plus a short daily forecast
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    /// Ordered by date, never longer than [`MAX_FORECAST_DAYS`]
    pub forecast: Vec<DailyForecast>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f32,
    /// Human-readable description of weather conditions
    pub condition: String,
    /// Relative humidity percentage (0-100)
    pub humidity: u8,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyForecast {
    pub date: NaiveDate,
    /// Daily high in Celsius
    pub high: f32,
    /// Daily low in Celsius
    pub low: f32,
    pub condition: String,
}

impl WeatherSnapshot {
    /// Sort the forecast by date and cap it at [`MAX_FORECAST_DAYS`]
    #[must_use]
    pub fn capped(mut self) -> Self {
        self.forecast.sort_by_key(|day| day.date);
        self.forecast.truncate(MAX_FORECAST_DAYS);
        self
    }
}

impl CurrentConditions {
    /// Format temperature with unit and its Fahrenheit equivalent
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!(
            "{:.1}°C ({:.1}°F)",
            self.temperature,
            celsius_to_fahrenheit(self.temperature)
        )
    }
}

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f32) -> f32 {
    celsius * 9.0 / 5.0 + 32.0
}
