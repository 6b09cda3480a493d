//! Weather resolution for the Skycast dashboard.
//!
//! Picks between a live reading and a trained-model prediction for a city,
//! fills in the 7-day outlook, and gathers best-effort air quality and chart
//! data alongside it.

pub mod backend;
pub mod client;
pub mod dashboard;
pub mod derive;
pub mod error;
pub mod forecast;
pub mod policy;
pub mod resolver;
pub mod synth;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::WeatherBackend;
pub use client::PredictionApiClient;
pub use dashboard::{Dashboard, DashboardView};
pub use error::ResolveError;
pub use policy::TrustPolicy;
pub use resolver::WeatherResolver;
pub use types::*;
