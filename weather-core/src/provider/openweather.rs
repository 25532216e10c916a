use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};
use url::Url;

use crate::{error::FetchError, model::WeatherReading, request::redact};

use super::WeatherFetcher;

/// Client for the OpenWeather "current weather" endpoint.
///
/// Uses the platform defaults for timeouts and redirects and never retries.
#[derive(Debug, Clone, Default)]
pub struct OpenWeatherClient {
    http: Client,
}

impl OpenWeatherClient {
    pub fn new() -> Self {
        Self { http: Client::new() }
    }

    pub fn with_client(http: Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl WeatherFetcher for OpenWeatherClient {
    async fn fetch_weather(&self, url: &Url) -> Result<WeatherReading, FetchError> {
        debug!(url = %redact(url), "requesting current weather");

        let res = self.http.get(url.clone()).send().await.map_err(|e| {
            if e.is_builder() {
                FetchError::Internal(format!("failed to build OpenWeather request: {e}"))
            } else {
                warn!(error = %e, "OpenWeather request failed");
                FetchError::Network(e.to_string())
            }
        })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| FetchError::Network(format!("failed to read OpenWeather response body: {e}")))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "OpenWeather returned an error status");
            return Err(FetchError::Status { status: status.as_u16(), body: truncate_body(&body) });
        }

        let reading = parse_current(&body)?;
        info!(
            city = %reading.city_label,
            kelvin = reading.temperature_kelvin,
            "received current weather"
        );

        Ok(reading)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f32,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: Option<String>,
    main: OwMain,
}

/// Pulls `main.temp` (Kelvin) and the optional place `name` out of a response body.
pub fn parse_current(body: &str) -> Result<WeatherReading, FetchError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body)
        .map_err(|e| FetchError::Parse(format!("failed to parse OpenWeather current JSON: {e}")))?;

    Ok(WeatherReading {
        city_label: parsed.name.unwrap_or_default(),
        temperature_kelvin: parsed.main.temp,
        fetched_at: Utc::now(),
    })
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
