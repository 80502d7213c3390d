use std::{error::Error, io::Write, path::PathBuf, time::Duration};

use clap::{ArgAction, CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing::debug;
use weather_core::{
    ApiError, ConfigResolver, ConnectOptions, Environment, OpenWeatherClient, WeatherService,
};

use crate::render;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Show current weather for a city")]
pub struct Cli {
    /// City name, e.g. "London" or "São Paulo".
    pub city: Option<String>,

    /// Config file with `api.key` / `api.base.url` entries (TOML or `key=value` lines).
    #[arg(long, env = "WEATHER_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Request timeout in seconds.
    #[arg(
        long,
        value_name = "SECS",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout: u64,

    /// Skip the ASCII-art icon.
    #[arg(long)]
    pub plain: bool,

    /// Raise log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }

    /// Run one lookup and return the process exit status.
    ///
    /// Output goes to `out`, error messages to `err`.
    pub async fn run<E: Environment>(
        self,
        env: E,
        cancel: CancellationToken,
        out: &mut impl Write,
        err: &mut impl Write,
    ) -> u8 {
        let Some(city) = self.city.as_deref() else {
            let _ = writeln!(out, "{}", Self::command().render_usage());
            let _ = writeln!(out, "Example: weather London");
            return EXIT_FAILURE;
        };

        let resolver = match &self.config {
            Some(path) => ConfigResolver::new(env, path),
            None => ConfigResolver::with_default_location(env),
        };

        let credentials = match resolver.resolve_credentials() {
            Ok(credentials) => credentials,
            Err(e) => return report(err, "Configuration error", &e),
        };

        let options = ConnectOptions {
            timeout: Duration::from_secs(self.timeout),
            cancel,
        };
        let result = match OpenWeatherClient::connect(credentials, options) {
            Ok(client) => WeatherService::new(Box::new(client)).lookup(city).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(weather) => {
                if let Err(e) = writeln!(out, "{}", render::render(&weather, !self.plain)) {
                    debug!(error = %e, "failed to write weather report");
                    return EXIT_FAILURE;
                }
                EXIT_SUCCESS
            }
            Err(e) => report(err, "Error fetching weather data", &e),
        }
    }
}

fn report(err: &mut impl Write, context: &str, error: &ApiError) -> u8 {
    // Only the user-safe message is printed; the source chain stays in the log.
    debug!(error = %error_chain(error), "{context}");
    let _ = writeln!(err, "{context}: {error}");
    error.exit_code()
}

/// `Display` of `error` and each of its sources, joined with `": "`.
fn error_chain(error: &dyn Error) -> String {
    let mut chain = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}
