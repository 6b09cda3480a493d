//! Model trust policy.
//!
//! A trained model is preferred over a live reading only for cities on an
//! explicit allow-list, and only when the API actually has a model that
//! covers the city.

use std::collections::HashSet;

use crate::types::ModelAvailability;

/// Normalize a city name the way the prediction API keys its models:
/// lowercase, trimmed, spaces to underscores, legacy names mapped.
pub fn normalize_city(city: &str) -> String {
    let normalized = city.trim().to_lowercase().replace(' ', "_");
    match normalized.as_str() {
        "bangalore" => "bengaluru".to_string(),
        "bombay" => "mumbai".to_string(),
        "madras" => "chennai".to_string(),
        _ => normalized,
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrustPolicy {
    trusted: HashSet<String>,
}

impl TrustPolicy {
    pub fn new<I, S>(cities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let trusted = cities
            .into_iter()
            .map(|c| normalize_city(c.as_ref()))
            .filter(|c| !c.is_empty())
            .collect();
        Self { trusted }
    }

    pub fn from_config(config: &skycast_core::ResolverConfig) -> Self {
        Self::new(&config.trusted_cities)
    }

    /// Whether `city` is on the allow-list.
    pub fn is_listed(&self, city: &str) -> bool {
        self.trusted.contains(&normalize_city(city))
    }

    /// Both conditions must hold: the API covers the city and the city is
    /// on the allow-list.
    pub fn trusts(&self, city: &str, models: &ModelAvailability) -> bool {
        self.is_listed(city) && models.covers(city)
    }
}
