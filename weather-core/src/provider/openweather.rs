use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::{
    error::ApiError,
    model::{Credentials, WeatherQuery, WeatherResult},
    transport::{DEFAULT_TIMEOUT, HttpResponse, HttpTransport, ReqwestTransport},
};

use super::WeatherApiClient;

/// Options for [`OpenWeatherClient::connect`].
#[derive(Debug, Clone)]
pub struct ConnectOptions {
    pub timeout: Duration,
    pub cancel: CancellationToken,
}

impl Default for ConnectOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cancel: CancellationToken::new(),
        }
    }
}

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    credentials: Credentials,
    transport: Arc<dyn HttpTransport>,
}

impl OpenWeatherClient {
    pub fn new(
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ApiError> {
        ensure_api_key(&credentials.api_key)?;
        Ok(Self {
            credentials,
            transport,
        })
    }

    /// Build a client over a fresh `reqwest` transport.
    ///
    /// The key is checked before the transport is created.
    pub fn connect(credentials: Credentials, options: ConnectOptions) -> Result<Self, ApiError> {
        ensure_api_key(&credentials.api_key)?;

        let transport = ReqwestTransport::new(options.timeout)?.with_cancellation(options.cancel);
        Self::new(credentials, Arc::new(transport))
    }

    fn request_url(&self, query: &WeatherQuery) -> Result<Url, ApiError> {
        Url::parse_with_params(
            &self.credentials.base_url,
            &[
                ("q", query.city()),
                ("appid", self.credentials.api_key.as_str()),
                ("units", "metric"),
            ],
        )
        .map_err(|e| ApiError::Network(Box::new(e)))
    }
}

#[async_trait]
impl WeatherApiClient for OpenWeatherClient {
    async fn fetch(&self, city: &str) -> Result<WeatherResult, ApiError> {
        let query = WeatherQuery::parse(city)?;
        let url = self.request_url(&query)?;

        debug!(url = %redact_api_key(&url), "requesting current weather");

        let HttpResponse { status, body } = self.transport.get(&url).await?;
        if status != 200 {
            return Err(classify_status(status, &body));
        }

        let result = decode_current(&body)?;
        debug!(city = %result.city, "decoded current weather");

        Ok(result)
    }
}

fn ensure_api_key(api_key: &str) -> Result<(), ApiError> {
    if api_key.trim().is_empty() {
        return Err(ApiError::invalid_input("API key cannot be null or empty"));
    }
    Ok(())
}

fn classify_status(status: u16, body: &str) -> ApiError {
    warn!(status, body = %truncate_body(body), "OpenWeatherMap request failed");

    match status {
        401 => ApiError::Unauthorized,
        404 => ApiError::NotFound,
        429 => ApiError::RateLimited,
        _ => ApiError::Upstream { status },
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
}

fn decode_current(body: &str) -> Result<WeatherResult, ApiError> {
    let parsed: OwCurrentResponse = serde_json::from_str(body).map_err(|e| {
        debug!(error = %e, "failed to parse OpenWeatherMap response");
        ApiError::Decode(e)
    })?;

    let description = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| {
            ApiError::Decode(<serde_json::Error as serde::de::Error>::custom(
                "weather array is empty",
            ))
        })?;

    Ok(WeatherResult {
        city: parsed.name,
        temperature_c: parsed.main.temp,
        description,
    })
}

fn redact_api_key(url: &Url) -> Url {
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v: String = if k == "appid" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();

    let mut redacted = url.clone();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
