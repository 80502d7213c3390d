//! Error taxonomy shared by every stage of the lookup pipeline.
//!
//! `Display` output is what the end user sees, so it never carries upstream
//! payloads. Underlying faults stay reachable through [`std::error::Error::source`]
//! for diagnostics.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::transport::TransportError;

/// Boxed error used to keep transport and parse faults as sources.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(
        "API key not found. Set the {env_var} environment variable or add {config_key} to {}",
        config_location(.path.as_deref())
    )]
    ConfigMissing {
        env_var: &'static str,
        config_key: &'static str,
        path: Option<PathBuf>,
    },

    #[error("Failed to load configuration file {}", .path.display())]
    ConfigFile {
        path: PathBuf,
        #[source]
        source: BoxError,
    },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Network error while fetching weather data")]
    Network(#[source] BoxError),

    #[error("Weather data fetch was interrupted")]
    Interrupted,

    #[error("Invalid API key")]
    Unauthorized,

    #[error("City not found")]
    NotFound,

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("API error: HTTP {status}")]
    Upstream { status: u16 },

    #[error("Error parsing weather data")]
    Decode(#[source] serde_json::Error),
}

impl ApiError {
    pub(crate) fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Process exit status for this error. Every kind is terminal.
    pub const fn exit_code(&self) -> u8 {
        1
    }
}

fn config_location(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "the config file".to_string(),
    }
}

impl From<TransportError> for ApiError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Network(source) => Self::Network(source),
            TransportError::Interrupted => Self::Interrupted,
        }
    }
}
