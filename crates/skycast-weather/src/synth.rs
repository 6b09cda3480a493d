//! Synthesized model inputs.
//!
//! When the model path runs there is no observed humidity, pressure, wind or
//! cloud cover to feed it, so plausible values are generated from the city
//! name and calendar date. The generator is seeded, so a city gets the same
//! inputs all day and different cities diverge. This is intentionally
//! non-physical: it stands in for per-city climatology that does not exist
//! yet.

use serde::{Deserialize, Serialize};

/// Coarse season used to pick parameter ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    /// March to May
    SpringSummer,
    /// June to September
    Monsoon,
    /// October to February
    AutumnWinter,
}

impl Season {
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Self::SpringSummer,
            6..=9 => Self::Monsoon,
            _ => Self::AutumnWinter,
        }
    }

    fn ranges(&self) -> SeasonRanges {
        match self {
            Self::SpringSummer => SeasonRanges {
                humidity: (40.0, 30.0),
                pressure: (1002.0, 10.0),
                wind_speed: (10.0, 12.0),
                clouds: (15.0, 35.0),
            },
            Self::Monsoon => SeasonRanges {
                humidity: (72.0, 25.0),
                pressure: (996.0, 10.0),
                wind_speed: (14.0, 16.0),
                clouds: (55.0, 40.0),
            },
            Self::AutumnWinter => SeasonRanges {
                humidity: (50.0, 30.0),
                pressure: (1010.0, 10.0),
                wind_speed: (5.0, 10.0),
                clouds: (10.0, 35.0),
            },
        }
    }
}

/// (base, spread) per parameter
struct SeasonRanges {
    humidity: (f64, f64),
    pressure: (f64, f64),
    wind_speed: (f64, f64),
    clouds: (f64, f64),
}

/// Linear congruential generator, 31-bit state.
#[derive(Debug, Clone)]
pub struct SeededRng {
    state: u64,
}

const LCG_MULTIPLIER: u64 = 1_103_515_245;
const LCG_INCREMENT: u64 = 12_345;
const LCG_MODULUS: u64 = 1 << 31;

impl SeededRng {
    pub fn new(seed: u32) -> Self {
        Self {
            state: u64::from(seed) % LCG_MODULUS,
        }
    }

    /// Seed from the lowercased city name and the calendar day.
    pub fn for_city_day(city: &str, month: u32, day: u32) -> Self {
        let hash = city_hash(city);
        Self::new(hash.wrapping_add(month.wrapping_mul(100).wrapping_add(day)))
    }

    /// Next value in [0, 1).
    pub fn next_unit(&mut self) -> f64 {
        self.state = (self.state * LCG_MULTIPLIER + LCG_INCREMENT) % LCG_MODULUS;
        self.state as f64 / LCG_MODULUS as f64
    }
}

/// `h = h * 31 + byte` over the lowercased, trimmed name.
pub fn city_hash(city: &str) -> u32 {
    city.trim()
        .to_lowercase()
        .bytes()
        .fold(0u32, |h, b| h.wrapping_mul(31).wrapping_add(u32::from(b)))
}

/// Stand-in model inputs for one city on one calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedParameters {
    pub humidity: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub clouds: f64,
    pub season: Season,
}

pub fn synthesize_parameters(city: &str, month: u32, day: u32) -> SynthesizedParameters {
    let season = Season::from_month(month);
    let ranges = season.ranges();
    let mut rng = SeededRng::for_city_day(city, month, day);

    let mut draw = |(base, spread): (f64, f64)| round1(base + spread * rng.next_unit());

    let humidity = draw(ranges.humidity).clamp(0.0, 100.0);
    let pressure = draw(ranges.pressure);
    let wind_speed = draw(ranges.wind_speed).max(0.0);
    let clouds = draw(ranges.clouds).clamp(0.0, 100.0);

    let params = SynthesizedParameters {
        humidity,
        pressure,
        wind_speed,
        clouds,
        season,
    };
    tracing::debug!(city, month, day, ?params, "Synthesized model inputs");
    params
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
