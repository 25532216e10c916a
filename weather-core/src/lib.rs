//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Temperature unit conversion
//! - OpenWeather request building and the HTTP client
//! - The search coordinator that drives one lookup at a time
//! - Configuration & credentials handling
//!
//! It is used by `weather-cli`, but any front-end can drive the
//! [`SearchCoordinator`] and listen to its [`SearchEvent`]s.

pub mod config;
pub mod coordinator;
pub mod error;
pub mod location;
pub mod model;
pub mod provider;
pub mod request;
pub mod units;

pub use config::Config;
pub use coordinator::{Phase, RequestId, SearchConfig, SearchCoordinator, SearchEvent, SearchOutcome};
pub use error::{ErrorKind, FetchError, SearchError, ValidationError};
pub use location::{FixedLocation, LocationError, LocationProvider};
pub use model::{Coordinates, LocationQuery, WeatherReading};
pub use provider::{WeatherFetcher, openweather::OpenWeatherClient};
pub use request::{RequestBuilder, build_city_url, build_geo_url};
pub use units::{DisplayTemperature, TemperatureUnit};
