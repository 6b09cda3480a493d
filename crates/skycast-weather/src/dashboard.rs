//! Everything the city page shows: the resolved snapshot plus best-effort
//! air quality and chart data.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skycast_core::ResolverConfig;

use crate::backend::WeatherBackend;
use crate::error::ResolveError;
use crate::resolver::WeatherResolver;
use crate::types::{AirQuality, ChartDay, WeatherSnapshot};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardView {
    pub snapshot: WeatherSnapshot,
    /// Absent when the AQI lookup failed
    pub air_quality: Option<AirQuality>,
    /// Empty when the chart lookup failed
    pub chart: Vec<ChartDay>,
}

pub struct Dashboard {
    backend: Arc<dyn WeatherBackend>,
    resolver: WeatherResolver,
}

impl Dashboard {
    pub fn new(backend: Arc<dyn WeatherBackend>, resolver: WeatherResolver) -> Self {
        Self { backend, resolver }
    }

    pub fn from_config(backend: Arc<dyn WeatherBackend>, config: &ResolverConfig) -> Self {
        let resolver = WeatherResolver::from_config(backend.clone(), config);
        Self::new(backend, resolver)
    }

    pub fn resolver(&self) -> &WeatherResolver {
        &self.resolver
    }

    /// Resolve `city`, then fetch AQI and chart data concurrently.
    ///
    /// Only the resolution can fail; the auxiliary lookups degrade to
    /// `None` / empty.
    pub async fn load(&self, city: &str) -> Result<DashboardView, ResolveError> {
        let snapshot = self.resolver.resolve(city).await?;
        let (air_quality, chart) = self.auxiliary(city).await;

        Ok(DashboardView {
            snapshot,
            air_quality,
            chart,
        })
    }

    async fn auxiliary(&self, city: &str) -> (Option<AirQuality>, Vec<ChartDay>) {
        let (aqi, chart) = tokio::join!(
            self.backend.air_quality(city),
            self.backend.forecast_chart(city)
        );

        let aqi = aqi
            .map_err(|e| tracing::warn!("Air quality lookup failed for {}: {}", city, e))
            .ok();
        let chart = chart
            .map(|c| c.forecast)
            .map_err(|e| tracing::warn!("Forecast chart lookup failed for {}: {}", city, e))
            .unwrap_or_default();

        (aqi, chart)
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("resolver", &self.resolver)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::TrustPolicy;
    use crate::testing::FakeBackend;
    use crate::types::{AqiCategory, ForecastChart, RainFlag, SnapshotSource};
    use chrono::NaiveDate;

    fn chart() -> ForecastChart {
        ForecastChart {
            city: "Mumbai".into(),
            forecast: (1..=7)
                .map(|d| ChartDay {
                    date: NaiveDate::from_ymd_opt(2026, 10, d).unwrap(),
                    temp_max: Some(31.0),
                    temp_min: Some(25.0),
                    rain_probability: Some(40.0),
                })
                .collect(),
        }
    }

    fn dashboard(backend: FakeBackend) -> Dashboard {
        let backend: Arc<dyn WeatherBackend> = Arc::new(backend);
        let resolver = WeatherResolver::new(backend.clone(), TrustPolicy::new(["Kolkata"]));
        Dashboard::new(backend, resolver)
    }

    #[tokio::test]
    async fn test_load_bundles_everything() {
        let dashboard = dashboard(
            FakeBackend::new()
                .with_live(FakeBackend::reading(30.0, 0.0, 50.0, 70.0))
                .with_air_quality(112.0)
                .with_chart(chart()),
        );

        let view = dashboard.load("Mumbai").await.unwrap();

        assert_eq!(view.snapshot.source, SnapshotSource::Live);
        assert_eq!(view.snapshot.forecast.len(), 7);
        let aqi = view.air_quality.unwrap();
        assert_eq!(aqi.category, AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(view.chart.len(), 7);
    }

    #[tokio::test]
    async fn test_auxiliary_failures_are_silent() {
        let dashboard = dashboard(FakeBackend::new().with_prediction(24.0, RainFlag::No, 0.2));

        let view = dashboard.load("Shimla").await.unwrap();

        assert_eq!(view.snapshot.source, SnapshotSource::Model);
        assert!(view.air_quality.is_none());
        assert!(view.chart.is_empty());
    }

    #[tokio::test]
    async fn test_one_auxiliary_failure_keeps_the_other() {
        let dashboard = dashboard(
            FakeBackend::new()
                .with_live(FakeBackend::reading(30.0, 0.0, 50.0, 70.0))
                .with_chart(chart()),
        );

        let view = dashboard.load("Mumbai").await.unwrap();
        assert!(view.air_quality.is_none());
        assert_eq!(view.chart.len(), 7);
    }

    #[tokio::test]
    async fn test_resolution_failure_propagates() {
        let dashboard = dashboard(FakeBackend::new().with_air_quality(20.0));

        let result = dashboard.load("Atlantis").await;
        assert!(matches!(result, Err(ResolveError::AllSourcesFailed { .. })));
    }

    #[test]
    fn test_from_config_uses_trust_table() {
        let mut config = ResolverConfig::default();
        config.trusted_cities = vec!["Chennai".into()];
        let dashboard = Dashboard::from_config(Arc::new(FakeBackend::new()), &config);
        assert!(dashboard.resolver().policy().is_listed("chennai"));
        assert!(!dashboard.resolver().policy().is_listed("kolkata"));
    }
}
