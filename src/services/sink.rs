// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Reading delivery: one line to the log file or stdout, then an optional
//! best-effort copy to the event collector.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{FlowValue, UsageReading};
use crate::services::HecClient;
use crate::time_utils;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink line for a value at a timestamp.
pub fn format_line(timestamp: &str, value: FlowValue) -> String {
    format!("{}: {}", timestamp, value)
}

/// Delivers readings to their destinations.
#[derive(Clone)]
pub struct Sink {
    log_file: Option<PathBuf>,
    hec: Option<HecClient>,
}

impl Sink {
    pub fn new(log_file: Option<PathBuf>, hec: Option<HecClient>) -> Self {
        Self { log_file, hec }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self::new(config.log_file.clone(), HecClient::from_config(config)?))
    }

    /// Write the reading, then forward it to the collector if configured.
    ///
    /// `stdout` receives the line only when no log file is configured. A
    /// failed local write is an error; a failed collector post is logged
    /// and otherwise ignored.
    pub async fn deliver<W: Write>(
        &self,
        reading: &UsageReading,
        stdout: &mut W,
    ) -> Result<(), AppError> {
        let line = format_line(&time_utils::now_local(), reading.value);

        match &self.log_file {
            Some(path) => {
                tracing::debug!(
                    path = %path.display(),
                    value = %reading.value,
                    "Appending reading to log file"
                );
                append_line(path, &line)?;
            }
            None => {
                writeln!(stdout, "{}", line)
                    .and_then(|_| stdout.flush())
                    .map_err(|e| AppError::io("<stdout>", e))?;
            }
        }

        if let Some(hec) = &self.hec {
            tracing::debug!(endpoint = %hec.endpoint(), "Sending reading to HEC");
            match hec.send(reading.value).await {
                Ok(()) => tracing::info!("Successfully posted to HEC"),
                Err(e) => tracing::warn!(error = %e, "Failed to send to HEC"),
            }
        }

        Ok(())
    }
}

fn append_line(path: &Path, line: &str) -> Result<(), AppError> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AppError::io(path, e))?;

    writeln!(file, "{}", line).map_err(|e| AppError::io(path, e))
}
