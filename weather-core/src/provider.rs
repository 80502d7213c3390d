use std::fmt::Debug;

use async_trait::async_trait;

use crate::{error::ApiError, model::WeatherResult};

pub mod openweather;

pub use openweather::OpenWeatherClient;

/// Fetches current conditions for a city from an upstream weather API.
#[async_trait]
pub trait WeatherApiClient: Send + Sync + Debug {
    async fn fetch(&self, city: &str) -> Result<WeatherResult, ApiError>;
}
