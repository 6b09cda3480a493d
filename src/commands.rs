//! Subcommand handlers. Each builds its own client from the loaded config.

use std::sync::Arc;

use skycast_core::{AppError, Config};
use skycast_weather::{
    Dashboard, DashboardView, PredictionApiClient, SnapshotSource, WeatherBackend,
};

fn client(config: &Config) -> Result<PredictionApiClient, AppError> {
    Ok(PredictionApiClient::from_config(&config.api)?)
}

pub async fn weather(config: &Config, city: &str, json: bool) -> Result<(), AppError> {
    let backend: Arc<dyn WeatherBackend> = Arc::new(client(config)?);
    let dashboard = Dashboard::from_config(backend, &config.resolver);

    let view = dashboard.load(city).await?;

    if json {
        let out = serde_json::to_string_pretty(&view).map_err(anyhow::Error::from)?;
        println!("{}", out);
    } else {
        print_dashboard(&view);
    }
    Ok(())
}

fn print_dashboard(view: &DashboardView) {
    let snapshot = &view.snapshot;
    let source = match snapshot.source {
        SnapshotSource::Live => "live reading",
        SnapshotSource::Model => "model prediction",
    };

    println!("{} ({})", snapshot.city, source);
    println!(
        "  {}°C  {}",
        snapshot.temperature_celsius,
        snapshot.condition.description()
    );
    println!(
        "  Humidity {}%  Rain {}%  Wind {} km/h",
        snapshot.humidity_percent, snapshot.rain_chance_percent, snapshot.wind_speed
    );

    if let Some(aqi) = &view.air_quality {
        match aqi.aqi {
            Some(index) => println!("  AQI {:.0} ({})", index, aqi.category.description()),
            None => println!("  AQI unavailable"),
        }
    }

    println!();
    println!("7-day outlook:");
    for day in &snapshot.forecast {
        println!(
            "  {:<4}{:>4}°C  {:>3}%  rain {:>3}%  {}",
            day.label,
            day.temperature,
            day.humidity_percent,
            day.rain_chance_percent,
            day.condition.description()
        );
    }

    if !view.chart.is_empty() {
        println!();
        println!("Provider forecast:");
        for day in &view.chart {
            println!(
                "  {}  {}/{}  rain {}",
                day.date,
                fmt_reading(day.temp_max, "°C"),
                fmt_reading(day.temp_min, "°C"),
                fmt_reading(day.rain_probability, "%")
            );
        }
    }
}

fn fmt_reading(value: Option<f64>, unit: &str) -> String {
    value
        .map(|v| format!("{:.0}{}", v, unit))
        .unwrap_or_else(|| "-".to_string())
}

pub async fn history(config: &Config, limit: u32) -> Result<(), AppError> {
    let records = client(config)?.history(limit).await?;

    if records.is_empty() {
        println!("No predictions recorded yet.");
        return Ok(());
    }

    for record in &records {
        println!(
            "{}  {:<12} {:>5.1}°C  rain {:?}  {}",
            record.timestamp.format("%Y-%m-%d %H:%M"),
            record.city.as_deref().unwrap_or("-"),
            record.predicted_temperature,
            record.predicted_rain,
            fmt_reading(record.rain_probability.map(|p| p * 100.0), "%")
        );
    }
    Ok(())
}

pub async fn stats(config: &Config) -> Result<(), AppError> {
    let stats = client(config)?.stats().await?;

    println!("Total predictions:   {}", stats.total_predictions);
    println!("Rain predictions:    {}", stats.rain_predictions);
    println!("No-rain predictions: {}", stats.no_rain_predictions);
    println!("Rain percentage:     {:.1}%", stats.rain_percentage);
    println!(
        "Average temperature: {:.1}°C",
        stats.average_predicted_temperature
    );
    Ok(())
}

pub async fn clear_history(config: &Config) -> Result<(), AppError> {
    let cleared = client(config)?.clear_history().await?;
    println!("{} ({} records)", cleared.message, cleared.records_deleted);
    Ok(())
}

pub async fn health(config: &Config) -> Result<(), AppError> {
    let models = client(config)?.model_availability().await?;

    println!("Status:   {}", models.status);
    println!("Models:   {}", if models.models_loaded { "loaded" } else { "not loaded" });
    if let Some(database) = &models.database {
        println!("Database: {}", database);
    }
    if !models.available_cities.is_empty() {
        println!("Cities:   {}", models.available_cities.join(", "));
    }
    Ok(())
}
