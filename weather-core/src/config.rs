//! Layered lookup of the API key and endpoint.
//!
//! Each value is taken from the first source that yields a non-blank string:
//! environment variable, then the config file, then (base URL only) a
//! built-in default.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use thiserror::Error;
use tracing::debug;

use crate::{error::ApiError, model::Credentials};

pub const API_KEY_ENV: &str = "OPENWEATHERMAP_API_KEY";
pub const API_URL_ENV: &str = "OPENWEATHERMAP_API_URL";
pub const API_KEY_CONFIG_KEY: &str = "api.key";
pub const API_URL_CONFIG_KEY: &str = "api.base.url";

/// Current-weather endpoint used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Read access to environment variables.
pub trait Environment {
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl Environment for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Config file that is neither TOML nor flat `key=value` lines.
///
/// Holds only the parser message and line number. The file may contain the
/// API key, so its contents are never kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid config syntax at line {line}: {message}")]
pub struct ConfigSyntaxError {
    pub line: usize,
    pub message: String,
}

impl ConfigSyntaxError {
    fn from_toml(err: &toml::de::Error, contents: &str) -> Self {
        let line = err
            .span()
            .and_then(|span| contents.get(..span.start))
            .map_or(1, |before| before.matches('\n').count() + 1);

        Self {
            line,
            message: err.message().to_string(),
        }
    }
}

/// Parsed contents of the optional config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    table: toml::Table,
}

impl ConfigFile {
    /// Load `path`. A missing file yields an empty config.
    pub fn load(path: &Path) -> Result<Self, ApiError> {
        if !path.exists() {
            debug!(path = %path.display(), "config file not present");
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| ApiError::ConfigFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })?;

        Self::parse(&contents).map_err(|e| ApiError::ConfigFile {
            path: path.to_path_buf(),
            source: Box::new(e),
        })
    }

    /// Parse TOML, falling back to flat `key=value` (or `key: value`) lines.
    ///
    /// In the flat form `#` and `!` start comment lines and values are taken
    /// verbatim after trimming.
    pub fn parse(contents: &str) -> Result<Self, ConfigSyntaxError> {
        match contents.parse::<toml::Table>() {
            Ok(table) => Ok(Self { table }),
            Err(toml_err) => match parse_flat(contents) {
                Some(table) => {
                    debug!("config file read as flat key=value lines");
                    Ok(Self { table })
                }
                None => Err(ConfigSyntaxError::from_toml(&toml_err, contents)),
            },
        }
    }

    /// Look up a dotted key such as `api.base.url`.
    ///
    /// Matches a quoted literal key (`"api.key" = ...`) as well as dotted keys
    /// and nested tables. Non-string values are treated as absent.
    pub fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = self.table.get(key) {
            return value.as_str();
        }

        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.table.get(first)?;
        for segment in segments {
            current = current.as_table()?.get(segment)?;
        }
        current.as_str()
    }
}

fn parse_flat(contents: &str) -> Option<toml::Table> {
    let mut table = toml::Table::new();

    for line in contents.lines().map(str::trim) {
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let (key, value) = line.split_once(['=', ':'])?;
        let key = key.trim();
        if key.is_empty() {
            return None;
        }
        table.insert(key.to_string(), toml::Value::String(value.trim().to_string()));
    }

    Some(table)
}

/// Resolves [`Credentials`] from environment and config file.
#[derive(Debug, Clone)]
pub struct ConfigResolver<E> {
    env: E,
    config_path: Option<PathBuf>,
}

impl<E: Environment> ConfigResolver<E> {
    pub fn new(env: E, config_path: impl Into<PathBuf>) -> Self {
        Self {
            env,
            config_path: Some(config_path.into()),
        }
    }

    /// Use the platform config directory; skip the file layer if none exists.
    pub fn with_default_location(env: E) -> Self {
        let config_path = Self::default_config_path();
        if config_path.is_none() {
            debug!("could not determine platform config directory");
        }
        Self { env, config_path }
    }

    /// Path to the config file in the platform config directory.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "weather-task", "weather-cli")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn resolve_api_key(&self) -> Result<String, ApiError> {
        if let Some(key) = self.env_value(API_KEY_ENV) {
            debug!(source = API_KEY_ENV, "resolved API key from environment");
            return Ok(key);
        }

        let file = self.load_file()?;
        if let Some(key) = file.get(API_KEY_CONFIG_KEY).and_then(non_blank) {
            debug!(source = API_KEY_CONFIG_KEY, "resolved API key from config file");
            return Ok(key);
        }

        Err(ApiError::ConfigMissing {
            env_var: API_KEY_ENV,
            config_key: API_KEY_CONFIG_KEY,
            path: self.config_path.clone(),
        })
    }

    pub fn resolve_base_url(&self) -> String {
        if let Some(url) = self.env_value(API_URL_ENV) {
            return url;
        }

        match self.load_file() {
            Ok(file) => {
                if let Some(url) = file.get(API_URL_CONFIG_KEY).and_then(non_blank) {
                    return url;
                }
            }
            Err(err) => debug!(error = %err, "ignoring unreadable config file for base URL"),
        }

        DEFAULT_BASE_URL.to_string()
    }

    pub fn resolve_credentials(&self) -> Result<Credentials, ApiError> {
        let api_key = self.resolve_api_key()?;
        let base_url = self.resolve_base_url();
        debug!(%base_url, "resolved credentials");

        Ok(Credentials { api_key, base_url })
    }

    fn env_value(&self, name: &str) -> Option<String> {
        self.env.var(name).as_deref().and_then(non_blank)
    }

    fn load_file(&self) -> Result<ConfigFile, ApiError> {
        match &self.config_path {
            Some(path) => ConfigFile::load(path),
            None => Ok(ConfigFile::default()),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
