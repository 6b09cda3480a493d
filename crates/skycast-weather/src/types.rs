use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::policy::normalize_city;

/// Headline weather condition shown on the city card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    #[default]
    Sunny,
    Cloudy,
    Rainy,
    Stormy,
    Snowy,
    Foggy,
    PartlyCloudy,
}

impl WeatherCondition {
    /// Get a human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
            Self::Stormy => "Stormy",
            Self::Snowy => "Snowy",
            Self::Foggy => "Foggy",
            Self::PartlyCloudy => "Partly Cloudy",
        }
    }
}

/// Per-day outlook label, derived only from that day's rain chance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOutlook {
    Sunny,
    PartlyCloudy,
    Cloudy,
    Rainy,
}

impl DayOutlook {
    /// >70 Rainy, >40 Cloudy, >20 Partly Cloudy, else Sunny.
    pub fn from_rain_chance(rain_chance_percent: u8) -> Self {
        match rain_chance_percent {
            71..=u8::MAX => Self::Rainy,
            41..=70 => Self::Cloudy,
            21..=40 => Self::PartlyCloudy,
            _ => Self::Sunny,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Sunny => "Sunny",
            Self::PartlyCloudy => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Rainy => "Rainy",
        }
    }
}

/// One entry of the synthesized 7-day outlook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastDay {
    pub label: String,
    pub temperature: i32,
    pub humidity_percent: u8,
    pub rain_chance_percent: u8,
    pub condition: DayOutlook,
}

/// Which upstream source backed a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotSource {
    Live,
    Model,
}

/// One fully-resolved weather result for a city.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// City as given by the caller
    pub city: String,
    pub temperature_celsius: i32,
    pub humidity_percent: u8,
    pub rain_chance_percent: u8,
    /// km/h
    pub wind_speed: i32,
    pub condition: WeatherCondition,
    /// Always 7 entries, Mon..Sun
    pub forecast: Vec<ForecastDay>,
    pub source: SnapshotSource,
    pub resolved_at: DateTime<Utc>,
}

/// Current conditions from `GET /weather/current`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiveReading {
    pub city: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    pub temperature: Option<f64>,
    #[serde(default)]
    pub rain_mm: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub clouds: f64,
    pub month: u32,
    pub day: u32,
    #[serde(default)]
    pub source: String,
    pub timestamp: DateTime<Utc>,
}

/// Binary rain verdict of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RainFlag {
    Yes,
    No,
}

impl RainFlag {
    pub fn is_yes(&self) -> bool {
        matches!(self, Self::Yes)
    }
}

/// Response of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPrediction {
    pub predicted_temperature: f64,
    pub predicted_rain: RainFlag,
    /// Probability of rain in [0, 1]
    pub rain_probability: f64,
}

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub clouds: f64,
    pub month: u32,
    pub day: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
}

/// Model inventory reported by `GET /health`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelAvailability {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub models_loaded: bool,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub available_cities: Vec<String>,
}

/// Key under which the API registers its generic model.
pub const DEFAULT_MODEL_KEY: &str = "default";

impl ModelAvailability {
    /// Whether the API would serve `city` from a dedicated model or the
    /// generic fallback model.
    ///
    /// Mirrors the API's own lookup: exact normalized match, then substring
    /// match in either direction, then the `default` model.
    pub fn covers(&self, city: &str) -> bool {
        if !self.models_loaded {
            return false;
        }

        let wanted = normalize_city(city);
        if wanted.is_empty() {
            return false;
        }

        self.available_cities.iter().any(|model_city| {
            let model_city = normalize_city(model_city);
            if model_city.is_empty() {
                return false;
            }
            model_city == DEFAULT_MODEL_KEY
                || model_city == wanted
                || model_city.contains(&wanted)
                || wanted.contains(&model_city)
        })
    }
}

/// US AQI bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum AqiCategory {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
    #[default]
    #[serde(other)]
    Unknown,
}

impl AqiCategory {
    pub fn from_us_aqi(aqi: f64) -> Self {
        if !aqi.is_finite() || aqi < 0.0 {
            Self::Unknown
        } else if aqi <= 50.0 {
            Self::Good
        } else if aqi <= 100.0 {
            Self::Moderate
        } else if aqi <= 150.0 {
            Self::UnhealthyForSensitiveGroups
        } else if aqi <= 200.0 {
            Self::Unhealthy
        } else if aqi <= 300.0 {
            Self::VeryUnhealthy
        } else {
            Self::Hazardous
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Self::Unhealthy => "Unhealthy",
            Self::VeryUnhealthy => "Very Unhealthy",
            Self::Hazardous => "Hazardous",
            Self::Unknown => "Unknown",
        }
    }
}

/// Response of `GET /air-quality`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQuality {
    pub city: String,
    pub aqi: Option<f64>,
    #[serde(default)]
    pub category: AqiCategory,
    #[serde(default)]
    pub pm25: Option<f64>,
    #[serde(default)]
    pub pm10: Option<f64>,
    #[serde(default)]
    pub source: String,
}

impl AirQuality {
    /// Fill in a missing category from the numeric index.
    pub fn normalized(mut self) -> Self {
        if self.category == AqiCategory::Unknown {
            if let Some(aqi) = self.aqi {
                self.category = AqiCategory::from_us_aqi(aqi);
            }
        }
        self
    }
}

/// One day of the provider's 7-day chart series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartDay {
    pub date: NaiveDate,
    pub temp_max: Option<f64>,
    pub temp_min: Option<f64>,
    pub rain_probability: Option<f64>,
}

/// Response of `GET /weather/forecast/7days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastChart {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub forecast: Vec<ChartDay>,
}

/// Stored prediction from `GET /history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub city: Option<String>,
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub clouds: f64,
    pub month: u32,
    pub day: u32,
    pub predicted_temperature: f64,
    pub predicted_rain: RainFlag,
    #[serde(default)]
    pub rain_probability: Option<f64>,
}

/// Aggregates from `GET /stats`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionStats {
    pub total_predictions: u64,
    pub rain_predictions: u64,
    pub no_rain_predictions: u64,
    pub rain_percentage: f64,
    pub average_predicted_temperature: f64,
}

/// Response of `DELETE /history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearHistoryResponse {
    pub message: String,
    pub records_deleted: u64,
}
