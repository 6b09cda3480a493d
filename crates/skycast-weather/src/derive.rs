//! Turning one upstream source into a snapshot.
//!
//! Each function consumes exactly one source; live readings and model
//! predictions are never blended.

use chrono::{DateTime, Utc};

use crate::forecast::{clamp_percent, synthesize_forecast, ForecastBase};
use crate::synth::SynthesizedParameters;
use crate::types::{
    ForecastDay, LiveReading, ModelPrediction, SnapshotSource, WeatherCondition, WeatherSnapshot,
};

/// Condition for a live reading. First match wins; hot and mild clear
/// days both end at Sunny.
pub fn live_condition(reading: &LiveReading) -> WeatherCondition {
    if reading.rain_mm > 5.0 {
        WeatherCondition::Rainy
    } else if reading.clouds > 70.0 {
        WeatherCondition::Cloudy
    } else if reading.clouds > 35.0 {
        WeatherCondition::PartlyCloudy
    } else if reading.humidity > 85.0 {
        WeatherCondition::Foggy
    } else {
        WeatherCondition::Sunny
    }
}

/// Any observed rain floors the chance at 70%; otherwise blend cloud cover
/// and humidity.
pub fn live_rain_chance(reading: &LiveReading) -> u8 {
    let chance = if reading.rain_mm > 0.0 {
        (70.0 + reading.rain_mm * 10.0).clamp(70.0, 100.0)
    } else {
        (reading.clouds * 0.7 + reading.humidity * 0.3).clamp(0.0, 100.0)
    };
    clamp_percent(chance.round() as i32)
}

pub fn prediction_condition(prediction: &ModelPrediction, humidity: f64) -> WeatherCondition {
    if prediction.predicted_rain.is_yes() {
        if humidity > 80.0 {
            WeatherCondition::Rainy
        } else {
            WeatherCondition::Cloudy
        }
    } else if prediction.predicted_temperature > 35.0 {
        WeatherCondition::Sunny
    } else if humidity > 70.0 {
        WeatherCondition::Cloudy
    } else if humidity > 50.0 {
        WeatherCondition::PartlyCloudy
    } else {
        WeatherCondition::Sunny
    }
}

pub fn prediction_rain_chance(prediction: &ModelPrediction) -> u8 {
    clamp_percent((prediction.rain_probability * 100.0).round() as i32)
}

/// Snapshot backed by a live reading.
///
/// `fallback_temperature` stands in when the provider reported none.
pub fn snapshot_from_live(
    city: &str,
    reading: &LiveReading,
    fallback_temperature: f64,
    resolved_at: DateTime<Utc>,
) -> WeatherSnapshot {
    snapshot_from_live_with(
        city,
        reading,
        fallback_temperature,
        resolved_at,
        synthesize_forecast,
    )
}

pub(crate) fn snapshot_from_live_with(
    city: &str,
    reading: &LiveReading,
    fallback_temperature: f64,
    resolved_at: DateTime<Utc>,
    forecast: impl FnOnce(ForecastBase) -> Vec<ForecastDay>,
) -> WeatherSnapshot {
    let temperature = reading.temperature.unwrap_or(fallback_temperature);
    let rain_chance = live_rain_chance(reading);

    WeatherSnapshot {
        city: city.to_string(),
        temperature_celsius: temperature.round() as i32,
        humidity_percent: clamp_percent(reading.humidity.round() as i32),
        rain_chance_percent: rain_chance,
        wind_speed: reading.wind_speed.round() as i32,
        condition: live_condition(reading),
        forecast: forecast(ForecastBase {
            temperature,
            humidity: reading.humidity,
            rain_fraction: f64::from(rain_chance) / 100.0,
        }),
        source: SnapshotSource::Live,
        resolved_at,
    }
}

/// Snapshot backed by a model prediction over synthesized inputs.
pub fn snapshot_from_prediction(
    city: &str,
    prediction: &ModelPrediction,
    params: &SynthesizedParameters,
    resolved_at: DateTime<Utc>,
) -> WeatherSnapshot {
    snapshot_from_prediction_with(city, prediction, params, resolved_at, synthesize_forecast)
}

pub(crate) fn snapshot_from_prediction_with(
    city: &str,
    prediction: &ModelPrediction,
    params: &SynthesizedParameters,
    resolved_at: DateTime<Utc>,
    forecast: impl FnOnce(ForecastBase) -> Vec<ForecastDay>,
) -> WeatherSnapshot {
    let rain_chance = prediction_rain_chance(prediction);

    WeatherSnapshot {
        city: city.to_string(),
        temperature_celsius: prediction.predicted_temperature.round() as i32,
        humidity_percent: clamp_percent(params.humidity.round() as i32),
        rain_chance_percent: rain_chance,
        wind_speed: params.wind_speed.round() as i32,
        condition: prediction_condition(prediction, params.humidity),
        forecast: forecast(ForecastBase {
            temperature: prediction.predicted_temperature,
            humidity: params.humidity,
            rain_fraction: f64::from(rain_chance) / 100.0,
        }),
        source: SnapshotSource::Model,
        resolved_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::Season;
    use crate::types::RainFlag;

    fn reading(
        temperature: Option<f64>,
        rain_mm: f64,
        clouds: f64,
        humidity: f64,
    ) -> LiveReading {
        LiveReading {
            city: "Mumbai".into(),
            country: Some("India".into()),
            latitude: Some(19.07),
            longitude: Some(72.87),
            temperature,
            rain_mm,
            humidity,
            pressure: 1008.0,
            wind_speed: 12.4,
            clouds,
            month: 8,
            day: 3,
            source: "open-meteo".into(),
            timestamp: Utc::now(),
        }
    }

    fn prediction(temp: f64, rain: RainFlag, probability: f64) -> ModelPrediction {
        ModelPrediction {
            predicted_temperature: temp,
            predicted_rain: rain,
            rain_probability: probability,
        }
    }

    fn params(humidity: f64) -> SynthesizedParameters {
        SynthesizedParameters {
            humidity,
            pressure: 1000.0,
            wind_speed: 14.6,
            clouds: 60.0,
            season: Season::Monsoon,
        }
    }

    #[test]
    fn test_heavy_rain_caps_at_100() {
        assert_eq!(live_rain_chance(&reading(Some(28.0), 10.0, 20.0, 50.0)), 100);
    }

    #[test]
    fn test_light_rain_floors_at_70() {
        assert_eq!(live_rain_chance(&reading(Some(28.0), 0.1, 0.0, 0.0)), 71);
        assert_eq!(live_rain_chance(&reading(Some(28.0), 0.01, 0.0, 0.0)), 70);
    }

    #[test]
    fn test_dry_blend() {
        // 50 * 0.7 + 40 * 0.3 = 47
        assert_eq!(live_rain_chance(&reading(Some(28.0), 0.0, 50.0, 40.0)), 47);
    }

    #[test]
    fn test_live_condition_cascade() {
        assert_eq!(
            live_condition(&reading(None, 6.0, 90.0, 95.0)),
            WeatherCondition::Rainy
        );
        assert_eq!(
            live_condition(&reading(None, 5.0, 71.0, 95.0)),
            WeatherCondition::Cloudy
        );
        assert_eq!(
            live_condition(&reading(None, 0.0, 36.0, 95.0)),
            WeatherCondition::PartlyCloudy
        );
        assert_eq!(
            live_condition(&reading(None, 0.0, 35.0, 86.0)),
            WeatherCondition::Foggy
        );
        assert_eq!(
            live_condition(&reading(Some(38.0), 0.0, 10.0, 40.0)),
            WeatherCondition::Sunny
        );
        assert_eq!(
            live_condition(&reading(Some(20.0), 0.0, 10.0, 40.0)),
            WeatherCondition::Sunny
        );
    }

    #[test]
    fn test_prediction_condition_rain_yes() {
        let wet = prediction(27.0, RainFlag::Yes, 0.8);
        assert_eq!(prediction_condition(&wet, 81.0), WeatherCondition::Rainy);
        assert_eq!(prediction_condition(&wet, 80.0), WeatherCondition::Cloudy);
    }

    #[test]
    fn test_prediction_condition_rain_no() {
        assert_eq!(
            prediction_condition(&prediction(36.0, RainFlag::No, 0.1), 90.0),
            WeatherCondition::Sunny
        );
        let mild = prediction(30.0, RainFlag::No, 0.1);
        assert_eq!(prediction_condition(&mild, 71.0), WeatherCondition::Cloudy);
        assert_eq!(prediction_condition(&mild, 51.0), WeatherCondition::PartlyCloudy);
        assert_eq!(prediction_condition(&mild, 50.0), WeatherCondition::Sunny);
    }

    #[test]
    fn test_prediction_rain_chance_clamped() {
        assert_eq!(prediction_rain_chance(&prediction(20.0, RainFlag::Yes, 0.734)), 73);
        assert_eq!(prediction_rain_chance(&prediction(20.0, RainFlag::Yes, 1.7)), 100);
        assert_eq!(prediction_rain_chance(&prediction(20.0, RainFlag::No, -0.2)), 0);
    }

    #[test]
    fn test_snapshot_from_live_defaults_temperature() {
        let mut captured = None;
        let snapshot = snapshot_from_live_with(
            "mumbai",
            &reading(None, 0.0, 50.0, 40.0),
            25.0,
            Utc::now(),
            |base| {
                captured = Some(base);
                Vec::new()
            },
        );

        assert_eq!(snapshot.city, "mumbai");
        assert_eq!(snapshot.temperature_celsius, 25);
        assert_eq!(snapshot.rain_chance_percent, 47);
        assert_eq!(snapshot.wind_speed, 12);
        assert_eq!(snapshot.source, SnapshotSource::Live);

        let base = captured.unwrap();
        assert_eq!(base.temperature, 25.0);
        assert_eq!(base.humidity, 40.0);
        assert!((base.rain_fraction - 0.47).abs() < 1e-9);
    }

    #[test]
    fn test_snapshot_from_live_has_full_outlook() {
        let snapshot = snapshot_from_live(
            "Pune",
            &reading(Some(31.6), 0.0, 20.0, 120.0),
            25.0,
            Utc::now(),
        );
        assert_eq!(snapshot.temperature_celsius, 32);
        assert_eq!(snapshot.humidity_percent, 100);
        assert_eq!(snapshot.forecast.len(), 7);
    }

    #[test]
    fn test_snapshot_from_prediction() {
        let snapshot = snapshot_from_prediction(
            "Kolkata",
            &prediction(30.46, RainFlag::Yes, 0.73),
            &params(85.2),
            Utc::now(),
        );

        assert_eq!(snapshot.temperature_celsius, 30);
        assert_eq!(snapshot.humidity_percent, 85);
        assert_eq!(snapshot.rain_chance_percent, 73);
        assert_eq!(snapshot.wind_speed, 15);
        assert_eq!(snapshot.condition, WeatherCondition::Rainy);
        assert_eq!(snapshot.source, SnapshotSource::Model);
        assert_eq!(snapshot.forecast.len(), 7);
    }
}
