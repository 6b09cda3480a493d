//! HTTP client for the weather prediction API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use skycast_core::{ApiConfig, NetworkError, ReqwestErrorExt};
use tracing::instrument;

use crate::backend::WeatherBackend;
use crate::types::{
    AirQuality, ClearHistoryResponse, ForecastChart, LiveReading, ModelAvailability,
    ModelPrediction, PredictionRecord, PredictionRequest, PredictionStats,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

#[derive(Debug, Clone)]
pub struct PredictionApiClient {
    client: Client,
    base_url: String,
}

impl PredictionApiClient {
    pub fn new(base_url: &str) -> Result<Self, NetworkError> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, NetworkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| e.into_network_error())?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self, NetworkError> {
        Self::with_timeout(&config.base_url, Duration::from_secs(config.timeout_secs))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Recent stored predictions, newest first.
    #[instrument(skip(self), level = "info")]
    pub async fn history(&self, limit: u32) -> Result<Vec<PredictionRecord>, NetworkError> {
        let response = self
            .client
            .get(self.url("/history"))
            .query(&[("limit", limit)])
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        handle_response(response).await
    }

    #[instrument(skip(self), level = "info")]
    pub async fn stats(&self) -> Result<PredictionStats, NetworkError> {
        let response = self
            .client
            .get(self.url("/stats"))
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        handle_response(response).await
    }

    /// Delete every stored prediction.
    #[instrument(skip(self), level = "info")]
    pub async fn clear_history(&self) -> Result<ClearHistoryResponse, NetworkError> {
        let response = self
            .client
            .delete(self.url("/history"))
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        handle_response(response).await
    }

    async fn get_for_city<T: DeserializeOwned>(
        &self,
        path: &str,
        city: &str,
    ) -> Result<T, NetworkError> {
        let response = self
            .client
            .get(self.url(path))
            .query(&[("city", city)])
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        handle_response(response).await
    }
}

#[async_trait]
impl WeatherBackend for PredictionApiClient {
    #[instrument(skip(self), level = "info")]
    async fn live_weather(&self, city: &str) -> Result<LiveReading, NetworkError> {
        self.get_for_city("/weather/current", city).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn model_availability(&self) -> Result<ModelAvailability, NetworkError> {
        let response = self
            .client
            .get(self.url("/health"))
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        handle_response(response).await
    }

    #[instrument(skip(self), level = "info")]
    async fn predict(&self, request: &PredictionRequest) -> Result<ModelPrediction, NetworkError> {
        let response = self
            .client
            .post(self.url("/predict"))
            .json(request)
            .send()
            .await
            .map_err(|e| e.into_network_error())?;

        handle_response(response).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn air_quality(&self, city: &str) -> Result<AirQuality, NetworkError> {
        let reading: AirQuality = self.get_for_city("/air-quality", city).await?;
        Ok(reading.normalized())
    }

    #[instrument(skip(self), level = "debug")]
    async fn forecast_chart(&self, city: &str) -> Result<ForecastChart, NetworkError> {
        self.get_for_city("/weather/forecast/7days", city).await
    }
}

/// Decode a success body, or turn the status and FastAPI `detail` into a
/// `ServerError`.
async fn handle_response<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, NetworkError> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| NetworkError::InvalidResponse(format!("JSON parse error: {}", e)));
    }

    let text = response.text().await.unwrap_or_default();
    let message = error_detail(&text).unwrap_or_else(|| {
        if text.is_empty() {
            status.to_string()
        } else {
            text
        }
    });

    tracing::debug!("Prediction API returned {}: {}", status, message);
    Err(NetworkError::ServerError {
        status: status.as_u16(),
        message,
    })
}

fn error_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    match value.get("detail")? {
        serde_json::Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = PredictionApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/health"), "http://localhost:8000/health");
    }

    #[test]
    fn test_from_config() {
        let config = ApiConfig {
            base_url: "http://weather.internal:9000".into(),
            timeout_secs: 3,
        };
        let client = PredictionApiClient::from_config(&config).unwrap();
        assert_eq!(client.base_url(), "http://weather.internal:9000");
    }

    #[test]
    fn test_error_detail_extraction() {
        assert_eq!(
            error_detail(r#"{"detail":"City not found: Atlantis"}"#).as_deref(),
            Some("City not found: Atlantis")
        );
        assert!(error_detail(r#"{"detail":[{"loc":["body","humidity"]}]}"#)
            .unwrap()
            .contains("humidity"));
        assert_eq!(error_detail("Internal Server Error"), None);
        assert_eq!(error_detail(r#"{"error":"x"}"#), None);
    }
}
