//! Skycast command-line dashboard.
//!
//! Usage:
//! ```bash
//! # Resolve a city (trusted model or live reading) with AQI and chart data
//! skycast weather Kolkata
//!
//! # Same, as JSON
//! skycast weather Mumbai --json
//!
//! # Stored predictions and aggregate statistics
//! skycast history --limit 20
//! skycast stats
//!
//! # API status and the cities with trained models
//! skycast health
//! ```

mod commands;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use skycast_core::{AppError, Config, ConfigError};
use skycast_weather::client::DEFAULT_HISTORY_LIMIT;

#[derive(Parser)]
#[command(
    name = "skycast",
    about = "Weather dashboard for the prediction API",
    long_about = "Resolves city weather from live readings or trusted model predictions, with a 7-day outlook, air quality and prediction history."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Prediction API base URL override
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable debug logging
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Show current weather, 7-day outlook and air quality for a city
    Weather {
        /// City name
        #[arg(value_parser = parse_city)]
        city: String,

        /// Print the dashboard as JSON
        #[arg(long)]
        json: bool,
    },

    /// List recent stored predictions
    History {
        /// Maximum number of records
        #[arg(long, default_value_t = DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },

    /// Show prediction statistics
    Stats,

    /// Delete all stored predictions
    ClearHistory,

    /// Check API health and list cities with trained models
    Health,
}

fn parse_city(value: &str) -> Result<String, String> {
    let city = value.trim();
    if city.is_empty() {
        return Err("city name cannot be empty".into());
    }
    Ok(city.to_string())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("{}", e.user_message());
            if matches!(e, AppError::Network(_) | AppError::WeatherUnavailable { .. }) {
                eprintln!("Run the command again to retry.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let (config, validation) =
        Config::load_validated(cli.api_url.as_deref()).map_err(config_error)?;

    let log_level = if cli.verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    skycast_core::init(log_level)?;

    for warning in &validation.warnings {
        tracing::warn!("Config warning: {}", warning);
    }
    tracing::debug!("Using prediction API at {}", config.api.base_url);

    match cli.command {
        Command::Weather { city, json } => commands::weather(&config, &city, json).await,
        Command::History { limit } => commands::history(&config, limit).await,
        Command::Stats => commands::stats(&config).await,
        Command::ClearHistory => commands::clear_history(&config).await,
        Command::Health => commands::health(&config).await,
    }
}

/// Keep `ConfigError` as its own variant so the user sees the config hint.
fn config_error(err: anyhow::Error) -> AppError {
    match err.downcast::<ConfigError>() {
        Ok(config_err) => AppError::Config(config_err),
        Err(other) => AppError::Other(other),
    }
}
