//! Configuration management for the trip planner
//!
//! Settings come from an optional TOML file, then `TRAVEL_PLANNER__*`
//! environment variables, then the conventional provider variables
//! (`GOOGLE_API_KEY`, `OPENWEATHER_API_KEY`, ...). Every field has a default,
//! so an empty configuration plans trips with mock data.

use crate::PlanningError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TravelPlannerConfig {
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub flights: FlightsConfig,
    #[serde(default)]
    pub places: PlacesConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings shared by every data source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Serve deterministic mock data instead of calling providers
    #[serde(default)]
    pub use_mock_data: bool,
    /// Refuse to start when a live provider has no credential
    #[serde(default)]
    pub strict_credentials: bool,
    /// Timeout for a single live provider call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// OpenWeatherMap settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

/// Kiwi Tequila settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightsConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_flights_base_url")]
    pub base_url: String,
    /// Currency prices are quoted in
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Google Places settings, used for hotels and attractions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlacesConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_places_base_url")]
    pub base_url: String,
}

/// Language model settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    #[serde(default = "default_llm_model")]
    pub model: String,
    /// Sampling temperature (0.0 - 2.0)
    #[serde(default = "default_llm_temperature")]
    pub temperature: f32,
    #[serde(default = "default_llm_timeout")]
    pub timeout_seconds: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or compact)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_request_timeout() -> u64 {
    10
}

fn default_weather_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_flights_base_url() -> String {
    "https://api.tequila.kiwi.com".to_string()
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_places_base_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_llm_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_llm_model() -> String {
    "gemini-1.5-flash-latest".to_string()
}

fn default_llm_temperature() -> f32 {
    0.7
}

fn default_llm_timeout() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            use_mock_data: false,
            strict_credentials: false,
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_weather_base_url(),
        }
    }
}

impl Default for FlightsConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_flights_base_url(),
            currency: default_currency(),
        }
    }
}

impl Default for PlacesConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_places_base_url(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
            temperature: default_llm_temperature(),
            timeout_seconds: default_llm_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ProvidersConfig {
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl LlmConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl TravelPlannerConfig {
    /// Load configuration from specified path, else the default file
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // TRAVEL_PLANNER_LLM__MODEL=... overrides llm.model
        builder = builder.add_source(
            Environment::with_prefix("TRAVEL_PLANNER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: TravelPlannerConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_env_overrides(|name| std::env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("travel-planner").join("config.toml"))
    }

    /// Honour the provider variables most deployments already set
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty("GOOGLE_API_KEY") {
            self.llm.api_key = Some(key);
        }
        if let Some(key) = non_empty("OPENWEATHER_API_KEY") {
            self.weather.api_key = Some(key);
        }
        if let Some(key) = non_empty("KIWI_API_KEY") {
            self.flights.api_key = Some(key);
        }
        if let Some(key) = non_empty("GOOGLE_PLACES_API_KEY") {
            self.places.api_key = Some(key);
        }
        if let Some(flag) = non_empty("USE_MOCK_DATA") {
            let flag = flag.trim().to_lowercase();
            self.providers.use_mock_data = matches!(flag.as_str(), "true" | "1" | "yes");
        }
    }

    /// Apply default values to fields left empty
    pub fn apply_defaults(&mut self) {
        if self.weather.base_url.is_empty() {
            self.weather.base_url = default_weather_base_url();
        }
        if self.flights.base_url.is_empty() {
            self.flights.base_url = default_flights_base_url();
        }
        if self.flights.currency.is_empty() {
            self.flights.currency = default_currency();
        }
        if self.places.base_url.is_empty() {
            self.places.base_url = default_places_base_url();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        for (name, seconds) in [
            ("providers.request_timeout_seconds", self.providers.request_timeout_seconds),
            ("llm.timeout_seconds", self.llm.timeout_seconds),
        ] {
            if !(1..=300).contains(&seconds) {
                return Err(PlanningError::configuration(format!(
                    "{name} must be between 1 and 300 seconds, got {seconds}"
                )));
            }
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(PlanningError::configuration(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        Ok(())
    }

    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(PlanningError::configuration(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "compact"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(PlanningError::configuration(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for (name, url) in [
            ("weather.base_url", &self.weather.base_url),
            ("flights.base_url", &self.flights.base_url),
            ("places.base_url", &self.places.base_url),
            ("llm.base_url", &self.llm.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(PlanningError::configuration(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = TravelPlannerConfig::default();
        assert!(!config.providers.use_mock_data);
        assert_eq!(config.providers.request_timeout_seconds, 10);
        assert_eq!(config.llm.model, "gemini-1.5-flash-latest");
        assert_eq!(config.llm.temperature, 0.7);
        assert_eq!(config.logging.level, "info");
        assert!(config.weather.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = TravelPlannerConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(matches!(result, Err(PlanningError::Configuration { .. })));
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = TravelPlannerConfig::default();
        config.providers.request_timeout_seconds = 500;
        assert!(config.validate().unwrap_err().to_string().contains("between 1 and 300"));

        let mut config = TravelPlannerConfig::default();
        config.llm.temperature = 2.5;
        assert!(config.validate().unwrap_err().to_string().contains("temperature"));
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = TravelPlannerConfig::default();
        config.places.base_url = "ftp://example.com".to_string();
        assert!(config.validate().unwrap_err().to_string().contains("places.base_url"));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = HashMap::from([
            ("GOOGLE_API_KEY", "gemini-key"),
            ("KIWI_API_KEY", "kiwi-key"),
            ("OPENWEATHER_API_KEY", "  "),
            ("USE_MOCK_DATA", "True"),
        ]);
        let mut config = TravelPlannerConfig::default();
        config.apply_env_overrides(|name| vars.get(name).map(|v| (*v).to_string()));

        assert_eq!(config.llm.api_key.as_deref(), Some("gemini-key"));
        assert_eq!(config.flights.api_key.as_deref(), Some("kiwi-key"));
        assert!(config.weather.api_key.is_none());
        assert!(config.places.api_key.is_none());
        assert!(config.providers.use_mock_data);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[providers]
strict_credentials = true
request_timeout_seconds = 5

[llm]
model = "gemini-2.0-flash"
temperature = 0.2

[logging]
format = "compact"
"#
        )
        .unwrap();

        let config = TravelPlannerConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert!(config.providers.strict_credentials);
        assert_eq!(config.providers.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.flights.currency, "USD");
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[logging]\nlevel = \"loud\"").unwrap();
        let result = TravelPlannerConfig::load_from_path(Some(file.path().to_path_buf()));
        assert!(result.is_err());
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = TravelPlannerConfig::get_config_path() {
            assert!(path.ends_with("travel-planner/config.toml"));
        }
    }
}
