use std::sync::Arc;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{InquireError, Password, Select, Text};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::debug;
use weather_core::{
    Config, Coordinates, FixedLocation, LocationProvider, OpenWeatherClient, RequestId,
    SearchCoordinator, SearchError, SearchEvent, TemperatureUnit,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather by city or location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum UnitArg {
    C,
    F,
}

impl From<UnitArg> for TemperatureUnit {
    fn from(value: UnitArg) -> Self {
        match value {
            UnitArg::C => TemperatureUnit::Celsius,
            UnitArg::F => TemperatureUnit::Fahrenheit,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and display preferences.
    Configure,

    /// Show the current temperature for a city.
    Show {
        /// City name, e.g. "New York".
        city: String,

        /// Display unit; defaults to the configured one.
        #[arg(long, value_enum)]
        unit: Option<UnitArg>,
    },

    /// Show the current temperature for a coordinate pair, or the configured home.
    Here {
        #[arg(long, requires = "lon", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", allow_hyphen_values = true)]
        lon: Option<f64>,

        #[arg(long, value_enum)]
        unit: Option<UnitArg>,
    },

    /// Search repeatedly; `/unit` toggles °C/°F, `/here` uses your location, `/quit` exits.
    Interactive,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, unit } => {
                let (mut coordinator, mut events) = coordinator(unit)?;
                log_rejection(coordinator.submit_city_name(&city));
                settle(&mut coordinator, &mut events).await;
                Ok(())
            }
            Command::Here { lat, lon, unit } => {
                let config = Config::load()?;
                let location = location_for(&config, lat, lon);
                let (mut coordinator, mut events) = coordinator(unit)?;

                log_rejection(coordinator.submit_geolocation(location.current_location().await));
                settle(&mut coordinator, &mut events).await;
                Ok(())
            }
            Command::Interactive => interactive().await,
        }
    }
}

fn coordinator(
    unit: Option<UnitArg>,
) -> anyhow::Result<(SearchCoordinator, UnboundedReceiver<SearchEvent>)> {
    let config = Config::load()?;
    let mut search = config.search_config()?;
    if let Some(unit) = unit {
        search.unit = unit.into();
    }

    Ok(SearchCoordinator::new(search, Arc::new(OpenWeatherClient::new())))
}

fn location_for(config: &Config, lat: Option<f64>, lon: Option<f64>) -> FixedLocation {
    match (lat, lon) {
        (Some(lat), Some(lon)) => FixedLocation(Some(Coordinates::new(lat, lon))),
        _ => FixedLocation(config.home),
    }
}

/// Rejections are already reported through the event stream; only log them.
fn log_rejection(submitted: Result<RequestId, SearchError>) -> Option<RequestId> {
    submitted.map_err(|e| debug!(error = %e, "search rejected")).ok()
}

async fn settle(coordinator: &mut SearchCoordinator, events: &mut UnboundedReceiver<SearchEvent>) {
    render::drain(events);
    while coordinator.next_outcome().await.is_some() {
        render::drain(events);
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    config.country_code = Text::new("Country code for city searches (empty for none):")
        .with_default(&config.country_code)
        .prompt()
        .context("Failed to read country code")?
        .trim()
        .to_uppercase();

    let units = vec![TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit];
    let start = units.iter().position(|u| *u == config.unit).unwrap_or(0);
    config.unit = Select::new("Temperature unit:", units)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read temperature unit")?;

    config.save()?;
    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn interactive() -> anyhow::Result<()> {
    let config = Config::load()?;
    let location = FixedLocation(config.home);
    let (mut coordinator, mut events) = coordinator(None)?;

    loop {
        let prompt = format!("City ({}):", coordinator.unit().symbol());
        let input = match Text::new(&prompt).prompt() {
            Ok(input) => input,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(e) => return Err(e).context("Failed to read input"),
        };

        match input.trim() {
            "/quit" | "/q" => break,
            "/unit" | "/u" => {
                let unit = coordinator.unit().toggled();
                if coordinator.toggle_unit(unit).is_none() {
                    println!("Temperatures will be shown in {unit}.");
                }
            }
            "/here" => {
                log_rejection(coordinator.submit_geolocation(location.current_location().await));
            }
            "/last" => match coordinator.current_reading() {
                Some(reading) => println!(
                    "{} at {}: {} K",
                    reading.city_label,
                    reading.fetched_at.with_timezone(&Local).format("%H:%M:%S"),
                    reading.temperature_kelvin
                ),
                None => println!("No reading yet."),
            },
            city => {
                log_rejection(coordinator.submit_city_name(city));
            }
        }

        settle(&mut coordinator, &mut events).await;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use weather_core::SearchConfig;

    #[test]
    fn explicit_coordinates_win_over_home() {
        let config = Config { home: Some(Coordinates::new(1.0, 2.0)), ..Config::default() };

        let FixedLocation(explicit) = location_for(&config, Some(40.7128), Some(-74.006));
        assert_eq!(explicit, Some(Coordinates::new(40.7128, -74.006)));

        let FixedLocation(home) = location_for(&config, None, None);
        assert_eq!(home, Some(Coordinates::new(1.0, 2.0)));
    }

    #[tokio::test]
    async fn rejected_submissions_are_logged_not_propagated() {
        let (mut coordinator, mut events) =
            SearchCoordinator::new(SearchConfig::new("KEY"), Arc::new(OpenWeatherClient::new()));

        assert_eq!(log_rejection(coordinator.submit_city_name("  ")), None);
        let no_location = FixedLocation(None).current_location().await;
        assert_eq!(log_rejection(coordinator.submit_geolocation(no_location)), None);

        let errors = std::iter::from_fn(|| events.try_recv().ok())
            .filter(|e| matches!(e, SearchEvent::Error { .. }))
            .count();
        assert_eq!(errors, 2);
    }

    #[test]
    fn parses_negative_longitude() {
        let cli = Cli::try_parse_from(["weather", "here", "--lat", "40.7", "--lon", "-74.0", "--unit", "f"])
            .unwrap();

        match cli.command {
            Command::Here { lat, lon, unit } => {
                assert_eq!(lat, Some(40.7));
                assert_eq!(lon, Some(-74.0));
                assert!(matches!(unit, Some(UnitArg::F)));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
