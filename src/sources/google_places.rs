//! Google Places Text Search client shared by the hotel and places sources

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::PlacesConfig;
use crate::error::ProviderError;

#[derive(Debug, Deserialize)]
pub struct TextSearchResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<PlaceResult>,
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaceResult {
    pub name: String,
    pub rating: Option<f32>,
    /// 0 (free) to 4 (very expensive)
    pub price_level: Option<u8>,
    #[serde(default)]
    pub types: Vec<String>,
    pub formatted_address: Option<String>,
}

pub struct GooglePlacesClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn from_config(http: Client, config: &PlacesConfig) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingCredential("places.api_key".to_string()))?;

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run a free-text search, optionally restricted to one place type
    pub async fn text_search(
        &self,
        query: &str,
        place_type: Option<&str>,
    ) -> Result<Vec<PlaceResult>, ProviderError> {
        let mut url = format!(
            "{}/textsearch/json?query={}&key={}",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(&self.api_key)
        );
        if let Some(place_type) = place_type {
            url.push_str(&format!("&type={}", urlencoding::encode(place_type)));
        }

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(ProviderError::from_status("Google Places", status, error_text));
        }

        let parsed: TextSearchResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(format!("Failed to parse Google Places response: {e}")))?;
        debug!(status = %parsed.status, results = parsed.results.len(), "Google Places answered");

        check_status(parsed)
    }
}

/// Google reports most failures in the body with HTTP 200
pub fn check_status(response: TextSearchResponse) -> Result<Vec<PlaceResult>, ProviderError> {
    let detail = response.error_message.unwrap_or_else(|| response.status.clone());
    match response.status.as_str() {
        "OK" => Ok(response.results),
        "ZERO_RESULTS" => Err(ProviderError::Empty("Google Places found nothing".to_string())),
        "REQUEST_DENIED" => Err(ProviderError::Authentication(detail)),
        "OVER_QUERY_LIMIT" => Err(ProviderError::RateLimit(detail)),
        _ => Err(ProviderError::Status {
            status: 200,
            message: detail,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(json: &str) -> TextSearchResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_ok_returns_results() {
        let results = check_status(response(
            r#"{"status":"OK","results":[{"name":"Hotel Lutetia","rating":4.6,"price_level":4,"types":["lodging","spa"]}]}"#,
        ))
        .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].price_level, Some(4));
        assert!(results[0].types.contains(&"spa".to_string()));
    }

    #[test]
    fn test_body_status_is_mapped() {
        assert!(matches!(
            check_status(response(r#"{"status":"REQUEST_DENIED","error_message":"bad key"}"#)),
            Err(ProviderError::Authentication(msg)) if msg == "bad key"
        ));
        assert!(matches!(
            check_status(response(r#"{"status":"OVER_QUERY_LIMIT"}"#)),
            Err(ProviderError::RateLimit(_))
        ));
        assert!(matches!(
            check_status(response(r#"{"status":"ZERO_RESULTS","results":[]}"#)),
            Err(ProviderError::Empty(_))
        ));
        assert!(matches!(
            check_status(response(r#"{"status":"INVALID_REQUEST"}"#)),
            Err(ProviderError::Status { .. })
        ));
    }
}
