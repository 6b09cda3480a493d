//! Collaborator seam between the resolver and the prediction API.

use async_trait::async_trait;
use skycast_core::NetworkError;

use crate::types::{
    AirQuality, ForecastChart, LiveReading, ModelAvailability, ModelPrediction, PredictionRequest,
};

/// Upstream calls the resolver and dashboard depend on.
///
/// `PredictionApiClient` is the HTTP implementation; tests substitute
/// in-memory fakes.
#[async_trait]
pub trait WeatherBackend: Send + Sync {
    /// `GET /weather/current`
    async fn live_weather(&self, city: &str) -> Result<LiveReading, NetworkError>;

    /// `GET /health`: which cities have a trained model
    async fn model_availability(&self) -> Result<ModelAvailability, NetworkError>;

    /// `POST /predict`
    async fn predict(&self, request: &PredictionRequest) -> Result<ModelPrediction, NetworkError>;

    /// `GET /air-quality`, best-effort
    async fn air_quality(&self, city: &str) -> Result<AirQuality, NetworkError>;

    /// `GET /weather/forecast/7days`, best-effort
    async fn forecast_chart(&self, city: &str) -> Result<ForecastChart, NetworkError>;
}
