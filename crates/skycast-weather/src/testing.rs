//! In-memory `WeatherBackend` for unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use skycast_core::NetworkError;

use crate::backend::WeatherBackend;
use crate::types::{
    AirQuality, AqiCategory, ForecastChart, LiveReading, ModelAvailability, ModelPrediction,
    PredictionRequest, RainFlag,
};

/// Every endpoint without a configured response fails with a connection
/// error.
#[derive(Default)]
pub struct FakeBackend {
    live: Option<LiveReading>,
    models: Option<ModelAvailability>,
    prediction: Option<ModelPrediction>,
    air_quality: Option<AirQuality>,
    chart: Option<ForecastChart>,
    predict_calls: AtomicUsize,
    availability_calls: AtomicUsize,
    last_request: Mutex<Option<PredictionRequest>>,
}

fn offline(endpoint: &str) -> NetworkError {
    NetworkError::ConnectionFailed(format!("{} unreachable", endpoint))
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reading(temperature: f64, rain_mm: f64, clouds: f64, humidity: f64) -> LiveReading {
        LiveReading {
            city: "Test City".into(),
            country: Some("India".into()),
            latitude: Some(22.57),
            longitude: Some(88.36),
            temperature: Some(temperature),
            rain_mm,
            humidity,
            pressure: 1006.0,
            wind_speed: 11.0,
            clouds,
            month: 7,
            day: 15,
            source: "open-meteo".into(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_live(mut self, reading: LiveReading) -> Self {
        self.live = Some(reading);
        self
    }

    pub fn with_models(mut self, cities: &[&str]) -> Self {
        self.models = Some(ModelAvailability {
            status: "healthy".into(),
            models_loaded: true,
            database: Some("connected".into()),
            available_cities: cities.iter().map(|c| c.to_string()).collect(),
        });
        self
    }

    pub fn with_prediction(mut self, temperature: f64, rain: RainFlag, probability: f64) -> Self {
        self.prediction = Some(ModelPrediction {
            predicted_temperature: temperature,
            predicted_rain: rain,
            rain_probability: probability,
        });
        self
    }

    pub fn with_air_quality(mut self, aqi: f64) -> Self {
        self.air_quality = Some(AirQuality {
            city: "Test City".into(),
            aqi: Some(aqi),
            category: AqiCategory::from_us_aqi(aqi),
            pm25: None,
            pm10: None,
            source: "open-meteo".into(),
        });
        self
    }

    pub fn with_chart(mut self, chart: ForecastChart) -> Self {
        self.chart = Some(chart);
        self
    }

    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    pub fn availability_calls(&self) -> usize {
        self.availability_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<PredictionRequest> {
        self.last_request.lock().ok().and_then(|r| r.clone())
    }
}

#[async_trait]
impl WeatherBackend for FakeBackend {
    async fn live_weather(&self, _city: &str) -> Result<LiveReading, NetworkError> {
        self.live.clone().ok_or_else(|| offline("live weather"))
    }

    async fn model_availability(&self) -> Result<ModelAvailability, NetworkError> {
        self.availability_calls.fetch_add(1, Ordering::SeqCst);
        self.models.clone().ok_or_else(|| offline("health"))
    }

    async fn predict(&self, request: &PredictionRequest) -> Result<ModelPrediction, NetworkError> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_request.lock() {
            *last = Some(request.clone());
        }
        self.prediction.clone().ok_or_else(|| offline("predict"))
    }

    async fn air_quality(&self, _city: &str) -> Result<AirQuality, NetworkError> {
        self.air_quality.clone().ok_or_else(|| offline("air quality"))
    }

    async fn forecast_chart(&self, _city: &str) -> Result<ForecastChart, NetworkError> {
        self.chart.clone().ok_or_else(|| offline("forecast chart"))
    }
}
