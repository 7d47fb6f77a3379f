// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flume-Export CLI
//!
//! Obtains and renews Flume API tokens, and exports the last minute of
//! water usage to a log file, stdout and optionally a Splunk HEC. Meant to
//! be run once a minute from cron.

use clap::Parser;
use flume_export::{cli::Cli, commands, config::Config, AppState};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let config = Config::from_cli(Cli::parse());
    init_logging(config.verbose, config.log_json);
    tracing::debug!(mode = ?config.mode, api_url = %config.api_url, "Starting flume-export");

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => return fail(e),
    };

    let mut stdout = std::io::stdout();
    match commands::run(&state, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(e),
    }
}

fn fail(err: flume_export::error::AppError) -> ExitCode {
    eprintln!("flume-export: {}", err);
    ExitCode::from(err.exit_code())
}

/// Initialize logging on stderr; stdout carries readings.
///
/// `RUST_LOG` wins when set. Otherwise only errors are shown unless
/// `--verbose` is given.
fn init_logging(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("flume_export=debug,info")
        } else {
            EnvFilter::new("error")
        }
    });

    let format = if json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .with_current_span(true)
            .flatten_event(true)
            .with_writer(std::io::stderr)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    tracing_subscriber::registry().with(filter).with(format).init();
}
