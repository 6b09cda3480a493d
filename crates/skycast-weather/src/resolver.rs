//! City weather resolution.
//!
//! Decision order for one city:
//!
//! 1. Ask for a live reading. A failure here only means "no live reading".
//! 2. With a live reading in hand, check whether a trusted model applies
//!    (the API covers the city and the city is on the trust allow-list). If
//!    not, the snapshot comes from the live reading.
//! 3. Otherwise synthesize model inputs for today and ask for a prediction.
//!    If that fails but a live reading exists, the live reading still wins;
//!    only when both sources failed does resolution fail.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Utc};
use skycast_core::{NetworkError, ResolverConfig};

use crate::backend::WeatherBackend;
use crate::derive::{snapshot_from_live, snapshot_from_prediction};
use crate::error::ResolveError;
use crate::policy::TrustPolicy;
use crate::synth::synthesize_parameters;
use crate::types::{LiveReading, PredictionRequest, WeatherSnapshot};

pub struct WeatherResolver {
    backend: Arc<dyn WeatherBackend>,
    policy: TrustPolicy,
    fallback_temperature: f64,
}

impl WeatherResolver {
    pub fn new(backend: Arc<dyn WeatherBackend>, policy: TrustPolicy) -> Self {
        Self {
            backend,
            policy,
            fallback_temperature: ResolverConfig::default().fallback_temperature,
        }
    }

    pub fn from_config(backend: Arc<dyn WeatherBackend>, config: &ResolverConfig) -> Self {
        Self {
            backend,
            policy: TrustPolicy::from_config(config),
            fallback_temperature: config.fallback_temperature,
        }
    }

    pub fn with_fallback_temperature(mut self, celsius: f64) -> Self {
        self.fallback_temperature = celsius;
        self
    }

    pub fn policy(&self) -> &TrustPolicy {
        &self.policy
    }

    /// Resolve the current snapshot for `city`.
    pub async fn resolve(&self, city: &str) -> Result<WeatherSnapshot, ResolveError> {
        self.resolve_at(city, Utc::now()).await
    }

    /// Resolve as of `now`, which picks the calendar day used for
    /// synthesized model inputs and stamps the snapshot.
    #[tracing::instrument(skip(self, now), level = "info")]
    pub async fn resolve_at(
        &self,
        city: &str,
        now: DateTime<Utc>,
    ) -> Result<WeatherSnapshot, ResolveError> {
        let live = self.backend.live_weather(city).await;
        if let Err(e) = &live {
            tracing::warn!("Live weather unavailable for {}: {}", city, e);
        }

        if let Ok(reading) = &live {
            if !self.model_trusted(city).await {
                tracing::info!("Resolved {} from live weather", city);
                return Ok(self.live_snapshot(city, reading, now));
            }
            tracing::info!("Trusted model applies to {}, preferring prediction", city);
        }

        match self.predict(city, now).await {
            Ok(snapshot) => {
                tracing::info!("Resolved {} from model prediction", city);
                Ok(snapshot)
            }
            Err(model_err) => match live {
                Ok(reading) => {
                    tracing::warn!(
                        "Prediction failed for {} ({}), using live weather",
                        city,
                        model_err
                    );
                    Ok(self.live_snapshot(city, &reading, now))
                }
                Err(live_err) => {
                    tracing::error!("No weather source available for {}", city);
                    Err(ResolveError::AllSourcesFailed {
                        city: city.to_string(),
                        live: live_err,
                        model: model_err,
                    })
                }
            },
        }
    }

    /// A model lookup failure counts as "not trusted".
    async fn model_trusted(&self, city: &str) -> bool {
        if !self.policy.is_listed(city) {
            return false;
        }

        match self.backend.model_availability().await {
            Ok(models) => self.policy.trusts(city, &models),
            Err(e) => {
                tracing::warn!("Model availability lookup failed: {}", e);
                false
            }
        }
    }

    async fn predict(
        &self,
        city: &str,
        now: DateTime<Utc>,
    ) -> Result<WeatherSnapshot, NetworkError> {
        let (month, day) = (now.month(), now.day());
        let params = synthesize_parameters(city, month, day);

        let request = PredictionRequest {
            humidity: params.humidity,
            pressure: params.pressure,
            wind_speed: params.wind_speed,
            clouds: params.clouds,
            month,
            day,
            city: Some(city.to_string()),
        };

        let prediction = self.backend.predict(&request).await?;
        Ok(snapshot_from_prediction(city, &prediction, &params, now))
    }

    fn live_snapshot(
        &self,
        city: &str,
        reading: &LiveReading,
        now: DateTime<Utc>,
    ) -> WeatherSnapshot {
        snapshot_from_live(city, reading, self.fallback_temperature, now)
    }
}

impl std::fmt::Debug for WeatherResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherResolver")
            .field("policy", &self.policy)
            .field("fallback_temperature", &self.fallback_temperature)
            .finish()
    }
}
