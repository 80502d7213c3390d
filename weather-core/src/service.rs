use tracing::info;

use crate::{error::ApiError, model::WeatherResult, provider::WeatherApiClient};

/// Entry point used by front ends: one city in, one result out.
#[derive(Debug)]
pub struct WeatherService {
    client: Box<dyn WeatherApiClient>,
}

impl WeatherService {
    pub fn new(client: Box<dyn WeatherApiClient>) -> Self {
        Self { client }
    }

    /// Look up current weather for `city`.
    ///
    /// Blank input is rejected here as well as in the client, so callers get
    /// the same answer whichever client is plugged in.
    pub async fn lookup(&self, city: &str) -> Result<WeatherResult, ApiError> {
        if city.trim().is_empty() {
            return Err(ApiError::invalid_input("City name cannot be empty"));
        }

        info!(city = city.trim(), "looking up current weather");
        self.client.fetch(city).await
    }
}
