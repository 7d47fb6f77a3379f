// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Flume-Export: ship per-minute Flume water usage to a log or Splunk HEC
//!
//! This crate handles the Flume OAuth token lifecycle (obtain, persist,
//! renew) and the query pipeline that resolves the user's bridge device,
//! reads the last minute of usage and delivers it.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use error::AppError;
use services::{AuthClient, FlumeClient, IdentityResolver, Sink, UsageQuery};

/// Everything a run needs, built once from the configuration.
pub struct AppState {
    pub config: Config,
    pub auth: AuthClient,
    pub identity: IdentityResolver,
    pub usage: UsageQuery,
    pub sink: Sink,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = FlumeClient::from_config(&config)?;
        let sink = Sink::from_config(&config)?;

        Ok(Self {
            auth: AuthClient::new(client.clone()),
            identity: IdentityResolver::new(client.clone()),
            usage: UsageQuery::new(client),
            sink,
            config,
        })
    }
}
