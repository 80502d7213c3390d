//! Binary crate for the `weather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup and Ctrl-C handling
//! - Human-friendly output formatting and exit codes

use std::{io, process::ExitCode};

use clap::Parser;
use tokio_util::sync::CancellationToken;
use weather_core::ProcessEnv;

mod cli;
mod logging;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cmd = cli::Cli::parse();
    logging::init(cmd.log_level())?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let code = cmd.run(ProcessEnv, cancel, &mut io::stdout(), &mut io::stderr()).await;
    Ok(ExitCode::from(code))
}
