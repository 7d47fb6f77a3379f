// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Run configuration, built once at startup from CLI flags and environment.
//!
//! Nothing in the crate mutates a [`Config`] after construction; every
//! component receives it (or values taken from it) by reference.

use crate::cli::Cli;
use crate::models::TokenRequest;
use std::path::PathBuf;
use std::time::Duration;

/// Production Flume API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.flumetech.com";

/// Per-request HTTP timeout when none is configured.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Exchange username/password for a token pair.
    Auth,
    /// Exchange the stored refresh token for a new token pair.
    Renew,
    /// Print account metadata.
    Details,
    /// Query the last minute of usage and deliver it.
    Query,
}

/// Immutable run configuration.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Flume API ---
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub api_url: String,
    pub http_timeout: Duration,

    // --- Event collector ---
    pub hec_url: Option<String>,
    pub hec_token: Option<String>,
    pub hec_index: Option<String>,
    pub hec_sourcetype: Option<String>,

    // --- Local files ---
    pub token_file: Option<PathBuf>,
    pub log_file: Option<PathBuf>,

    pub verbose: bool,
    pub log_json: bool,
    pub mode: Mode,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            client_id: Some("test_client_id".to_string()),
            client_secret: Some("test_client_secret".to_string()),
            username: Some("test_user@example.com".to_string()),
            password: Some("test_password".to_string()),
            api_url: "http://127.0.0.1:9".to_string(),
            http_timeout: Duration::from_secs(5),
            hec_url: None,
            hec_token: None,
            hec_index: None,
            hec_sourcetype: None,
            token_file: None,
            log_file: None,
            verbose: false,
            log_json: false,
            mode: Mode::Query,
        }
    }
}

impl Config {
    /// Build the run configuration from parsed command-line arguments.
    ///
    /// Empty strings are treated as unset so that a blank environment
    /// variable behaves like a missing flag.
    pub fn from_cli(cli: Cli) -> Self {
        let mode = if cli.mode.auth {
            Mode::Auth
        } else if cli.mode.renew {
            Mode::Renew
        } else if cli.mode.details {
            Mode::Details
        } else {
            Mode::Query
        };

        Self {
            client_id: non_empty(cli.client_id),
            client_secret: non_empty(cli.client_secret).map(|v| v.trim().to_string()),
            username: non_empty(cli.username),
            password: non_empty(cli.password),
            api_url: cli.api_url.trim_end_matches('/').to_string(),
            http_timeout: Duration::from_secs(cli.timeout_secs.max(1)),
            hec_url: non_empty(cli.hec_url).map(|v| v.trim_end_matches('/').to_string()),
            hec_token: non_empty(cli.hec_token).map(|v| v.trim().to_string()),
            hec_index: non_empty(cli.hec_index),
            hec_sourcetype: non_empty(cli.hec_sourcetype),
            token_file: cli.token_file.filter(|p| !p.as_os_str().is_empty()),
            log_file: cli.log_file.filter(|p| !p.as_os_str().is_empty()),
            verbose: cli.verbose,
            log_json: cli.log_json,
            mode,
        }
    }

    /// Build the password-grant request, failing before any network call
    /// when one of the four required inputs is missing.
    pub fn password_grant(&self) -> Result<TokenRequest, ConfigError> {
        Ok(TokenRequest::Password {
            client_id: require(&self.client_id, "--clientid")?.to_string(),
            client_secret: require(&self.client_secret, "--clientsecret")?.to_string(),
            username: require(&self.username, "--username")?.to_string(),
            password: require(&self.password, "--password")?.to_string(),
        })
    }

    /// Build the refresh-grant request for a stored refresh token.
    pub fn refresh_grant(&self, refresh_token: &str) -> Result<TokenRequest, ConfigError> {
        Ok(TokenRequest::RefreshToken {
            refresh_token: refresh_token.to_string(),
            client_id: require(&self.client_id, "--clientid")?.to_string(),
            client_secret: require(&self.client_secret, "--clientsecret")?.to_string(),
        })
    }

    /// Token file path, required by every mode that reads stored tokens.
    pub fn require_token_file(&self) -> Result<&PathBuf, ConfigError> {
        self.token_file
            .as_ref()
            .ok_or(ConfigError::Missing("--tokenfile"))
    }

    /// HEC URL and token, if both are configured.
    pub fn hec_endpoint(&self) -> Option<(&str, &str)> {
        match (self.hec_url.as_deref(), self.hec_token.as_deref()) {
            (Some(url), Some(token)) => Some((url, token)),
            _ => None,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn require<'a>(value: &'a Option<String>, flag: &'static str) -> Result<&'a str, ConfigError> {
    value.as_deref().ok_or(ConfigError::Missing(flag))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required option {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_config_from_cli() {
        let cli = Cli::try_parse_from([
            "flume-export",
            "--clientid",
            "test_id",
            "--clientsecret",
            " test_secret ",
            "--api-url",
            "http://localhost:8080/",
            "--hecurl",
            "http://hec:8088/",
            "--hectoken",
            "hec-token",
            "--renew",
        ])
        .expect("args should parse");

        let config = Config::from_cli(cli);

        assert_eq!(config.mode, Mode::Renew);
        assert_eq!(config.client_id.as_deref(), Some("test_id"));
        assert_eq!(config.client_secret.as_deref(), Some("test_secret"));
        assert_eq!(config.api_url, "http://localhost:8080");
        assert_eq!(config.hec_endpoint(), Some(("http://hec:8088", "hec-token")));
        assert_eq!(config.http_timeout, Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS));
    }

    #[test]
    fn test_password_grant_requires_all_four_inputs() {
        let config = Config {
            password: None,
            ..Config::default()
        };

        let err = config.password_grant().unwrap_err();
        assert!(matches!(err, ConfigError::Missing("--password")));
    }

    #[test]
    fn test_refresh_grant_requires_client_credentials() {
        let config = Config {
            client_secret: None,
            ..Config::default()
        };

        let err = config.refresh_grant("rt").unwrap_err();
        assert!(matches!(err, ConfigError::Missing("--clientsecret")));
    }

    #[test]
    fn test_hec_needs_url_and_token() {
        let config = Config {
            hec_url: Some("http://hec:8088".to_string()),
            ..Config::default()
        };
        assert!(config.hec_endpoint().is_none());
    }

    #[test]
    fn test_token_file_required() {
        let config = Config::default();
        assert!(matches!(
            config.require_token_file(),
            Err(ConfigError::Missing("--tokenfile"))
        ));
    }
}
