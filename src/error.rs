// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with per-kind process exit codes.

use crate::config::ConfigError;
use std::path::PathBuf;

/// Application error type.
///
/// Every fatal condition of a run maps to exactly one variant, and each
/// variant maps to a distinct process exit code (see [`AppError::exit_code`]).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("I/O error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Malformed access token: {0}")]
    TokenFormat(String),

    #[error("Device resolution failed: {0}")]
    DeviceResolution(String),

    #[error("Flume API error: {0}")]
    VendorApi(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AppError::Io {
            path: path.into(),
            source,
        }
    }

    /// Process exit code for this error kind.
    ///
    /// `2` is shared with clap's usage errors since both mean the
    /// invocation itself was incomplete.
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Internal(_) => 1,
            AppError::Configuration(_) => 2,
            AppError::Authentication(_) => 3,
            AppError::Io { .. } => 4,
            AppError::Parse(_) => 5,
            AppError::TokenFormat(_) => 6,
            AppError::DeviceResolution(_) => 7,
            AppError::VendorApi(_) => 8,
        }
    }
}

/// Result type alias for fallible operations.
pub type Result<T> = std::result::Result<T, AppError>;
