use async_trait::async_trait;
use std::fmt::Debug;
use url::Url;

use crate::{error::FetchError, model::WeatherReading};

pub mod openweather;

/// Performs one weather lookup for a fully built request URL.
#[async_trait]
pub trait WeatherFetcher: Send + Sync + Debug {
    async fn fetch_weather(&self, url: &Url) -> Result<WeatherReading, FetchError>;
}
