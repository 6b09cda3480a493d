//! 7-day outlook synthesis.
//!
//! Each day jitters the snapshot's base values independently, so repeated
//! resolutions of the same city produce different outlooks.

use rand::Rng;

use crate::types::{DayOutlook, ForecastDay};

pub const DAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const TEMPERATURE_JITTER: i32 = 3;
const HUMIDITY_JITTER: i32 = 10;
const RAIN_JITTER: i32 = 15;

/// Base values the outlook is jittered around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForecastBase {
    pub temperature: f64,
    pub humidity: f64,
    /// Rain chance as a fraction in [0, 1]
    pub rain_fraction: f64,
}

/// Build the outlook with the thread-local RNG.
pub fn synthesize_forecast(base: ForecastBase) -> Vec<ForecastDay> {
    synthesize_forecast_with(&mut rand::thread_rng(), base)
}

pub fn synthesize_forecast_with<R: Rng + ?Sized>(
    rng: &mut R,
    base: ForecastBase,
) -> Vec<ForecastDay> {
    let base_temperature = finite_or(base.temperature, 0.0).round() as i32;
    let base_humidity = finite_or(base.humidity, 0.0).round() as i32;
    let base_rain = (finite_or(base.rain_fraction, 0.0) * 100.0).round() as i32;

    DAY_LABELS
        .iter()
        .map(|label| {
            let temperature = base_temperature
                .saturating_add(rng.gen_range(-TEMPERATURE_JITTER..=TEMPERATURE_JITTER));
            let humidity = clamp_percent(
                base_humidity.saturating_add(rng.gen_range(-HUMIDITY_JITTER..=HUMIDITY_JITTER)),
            );
            let rain =
                clamp_percent(base_rain.saturating_add(rng.gen_range(-RAIN_JITTER..=RAIN_JITTER)));

            ForecastDay {
                label: (*label).to_string(),
                temperature,
                humidity_percent: humidity,
                rain_chance_percent: rain,
                condition: DayOutlook::from_rain_chance(rain),
            }
        })
        .collect()
}

/// Clamp any integer into a percentage.
pub fn clamp_percent(value: i32) -> u8 {
    value.clamp(0, 100) as u8
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
