use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Label shown for lookups by position when the service doesn't name the place.
pub const CURRENT_LOCATION_LABEL: &str = "Current Weather";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// What the user asked to look up.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    CityName(String),
    Coordinates(Coordinates),
}

impl LocationQuery {
    pub fn city(name: &str) -> Self {
        Self::CityName(name.trim().to_string())
    }

    pub fn coordinates(latitude: f64, longitude: f64) -> Self {
        Self::Coordinates(Coordinates::new(latitude, longitude))
    }

    /// Label for a reading of this query. Cities keep the name as typed;
    /// coordinates use the place name the service reported, if any.
    pub fn label(&self, reported_name: &str) -> String {
        match self {
            Self::CityName(name) => name.clone(),
            Self::Coordinates(_) if !reported_name.trim().is_empty() => {
                reported_name.trim().to_string()
            }
            Self::Coordinates(_) => CURRENT_LOCATION_LABEL.to_string(),
        }
    }
}

/// Temperature reported by the service for one lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub city_label: String,
    pub temperature_kelvin: f32,
    pub fetched_at: DateTime<Utc>,
}
