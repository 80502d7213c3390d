//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Credential and endpoint resolution (environment, config file, defaults)
//! - The OpenWeatherMap client behind a substitutable HTTP transport
//! - The lookup service front ends call into
//! - Shared domain models and the error taxonomy
//!
//! It is used by `weather-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod service;
pub mod transport;

pub use config::{ConfigResolver, Environment, ProcessEnv};
pub use error::ApiError;
pub use model::{Credentials, WeatherQuery, WeatherResult};
pub use provider::{OpenWeatherClient, WeatherApiClient, openweather::ConnectOptions};
pub use service::WeatherService;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport, TransportError};
