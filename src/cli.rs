// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Command-line interface definition.
//!
//! Every option can also be supplied through an environment variable (or a
//! `.env` file loaded at startup), which keeps secrets out of cron lines.

use clap::{Args, Parser};
use std::path::PathBuf;

/// Export Flume water usage to a log file or a Splunk HTTP Event Collector.
#[derive(Debug, Parser)]
#[command(name = "flume-export")]
#[command(version)]
#[command(about = "Utility for exporting Flume water usage data")]
pub struct Cli {
    /// Flume API client ID.
    #[arg(long = "clientid", env = "FLUME_CLIENT_ID")]
    pub client_id: Option<String>,

    /// Flume API client secret.
    #[arg(long = "clientsecret", env = "FLUME_CLIENT_SECRET", hide_env_values = true)]
    pub client_secret: Option<String>,

    /// Flume username. Only required to obtain the initial token.
    #[arg(long, env = "FLUME_USERNAME")]
    pub username: Option<String>,

    /// Flume password. Only required to obtain the initial token.
    #[arg(long, env = "FLUME_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Full HEC URL, e.g. 'http://172.16.1.2:8088' or 'https://hec.example.com:443'.
    #[arg(long = "hecurl", env = "FLUME_HEC_URL")]
    pub hec_url: Option<String>,

    /// HEC token.
    #[arg(long = "hectoken", env = "FLUME_HEC_TOKEN", hide_env_values = true)]
    pub hec_token: Option<String>,

    /// Destination HEC index.
    #[arg(long = "hecindex", env = "FLUME_HEC_INDEX")]
    pub hec_index: Option<String>,

    /// Destination HEC sourcetype.
    #[arg(long = "hecsourcetype", env = "FLUME_HEC_SOURCETYPE")]
    pub hec_sourcetype: Option<String>,

    /// Token file. Written in --auth and --renew mode, read in every other mode.
    #[arg(long = "tokenfile", env = "FLUME_TOKEN_FILE")]
    pub token_file: Option<PathBuf>,

    /// File to append query results to. Results go to stdout when unset.
    #[arg(long = "logfile", env = "FLUME_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Flume API base URL.
    #[arg(long, env = "FLUME_API_URL", default_value = crate::config::DEFAULT_API_URL)]
    pub api_url: String,

    /// Timeout in seconds for each outbound HTTP request.
    #[arg(long, env = "FLUME_HTTP_TIMEOUT_SECS", default_value_t = crate::config::DEFAULT_HTTP_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Emit diagnostics as JSON lines on stderr.
    #[arg(long, env = "FLUME_LOG_JSON")]
    pub log_json: bool,

    /// Add verbosity.
    #[arg(long, short)]
    pub verbose: bool,

    #[command(flatten)]
    pub mode: ModeArgs,
}

/// Mutually exclusive mode selector; exactly one must be given.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct ModeArgs {
    /// Obtain an authentication token.
    #[arg(long)]
    pub auth: bool,

    /// Renew the stored authentication token.
    #[arg(long)]
    pub renew: bool,

    /// Print account metadata (user ID, device ID, tokens).
    #[arg(long)]
    pub details: bool,

    /// Query water usage for the last minute.
    #[arg(long)]
    pub query: bool,
}
