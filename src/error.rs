//! Error types for the trip planner
//!
//! `PlanningError` is what callers of the planner see. `ProviderError` is what
//! live data sources and the language model report; it is always absorbed at
//! the adapter or narrative boundary and never reaches the caller.

use std::time::Duration;

use thiserror::Error;

/// Errors surfaced by the planning orchestrator
#[derive(Error, Debug)]
pub enum PlanningError {
    /// The trip request was malformed
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Settings are invalid or a required credential is missing
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The itinerary could not be assembled consistently
    #[error("Itinerary assembly error: {message}")]
    Assembly { message: String },
}

impl PlanningError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new assembly error
    pub fn assembly<S: Into<String>>(message: S) -> Self {
        Self::Assembly {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            PlanningError::Validation { message } => format!("Invalid trip request: {message}"),
            PlanningError::Configuration { message } => {
                format!("Configuration error: {message}. Please check your config file and API keys.")
            }
            PlanningError::Assembly { .. } => {
                "The itinerary could not be put together. Please try again or report this issue."
                    .to_string()
            }
        }
    }
}

/// Failures of a live provider or the language model
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Missing credential: {0}")]
    MissingCredential(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("Rate limit error: {0}")]
    RateLimit(String),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Empty response: {0}")]
    Empty(String),
}

impl ProviderError {
    /// Map a non-success HTTP status to the matching provider error
    pub fn from_status(provider: &str, status: u16, body: String) -> Self {
        match status {
            401 | 403 => {
                ProviderError::Authentication(format!("{provider} rejected the credential"))
            }
            429 => ProviderError::RateLimit(format!("{provider} rate limit exceeded")),
            _ => ProviderError::Status {
                status,
                message: body,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let validation_err = PlanningError::validation("days out of range");
        assert!(matches!(validation_err, PlanningError::Validation { .. }));

        let config_err = PlanningError::configuration("missing API key");
        assert!(matches!(config_err, PlanningError::Configuration { .. }));

        let assembly_err = PlanningError::assembly("no day plans");
        assert!(matches!(assembly_err, PlanningError::Assembly { .. }));
    }

    #[test]
    fn test_user_messages() {
        let validation_err = PlanningError::validation("days must be between 1 and 30");
        assert!(validation_err.user_message().contains("between 1 and 30"));

        let config_err = PlanningError::configuration("weather key");
        assert!(config_err.user_message().contains("Configuration error"));

        let assembly_err = PlanningError::assembly("test");
        assert!(assembly_err.user_message().contains("itinerary"));
    }

    #[test]
    fn test_status_mapping() {
        assert!(matches!(
            ProviderError::from_status("Kiwi", 401, String::new()),
            ProviderError::Authentication(_)
        ));
        assert!(matches!(
            ProviderError::from_status("Kiwi", 429, String::new()),
            ProviderError::RateLimit(_)
        ));
        let err = ProviderError::from_status("Kiwi", 502, "bad gateway".to_string());
        assert_eq!(err.to_string(), "API error 502: bad gateway");
    }
}
