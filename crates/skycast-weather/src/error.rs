//! Resolution failures.

use skycast_core::{AppError, NetworkError};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// Neither the live reading nor the model prediction could be obtained.
    #[error("Weather unavailable for {city}: live weather failed ({live}); prediction failed ({model})")]
    AllSourcesFailed {
        city: String,
        live: NetworkError,
        model: NetworkError,
    },
}

impl ResolveError {
    /// The error from the last source tried, which is what the caller saw fail.
    pub fn transport(&self) -> &NetworkError {
        match self {
            Self::AllSourcesFailed { model, .. } => model,
        }
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        AppError::WeatherUnavailable {
            detail: err.to_string(),
            cause: err.transport().clone(),
        }
    }
}
