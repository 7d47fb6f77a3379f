// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Splunk HTTP Event Collector client.

use crate::config::Config;
use crate::models::FlowValue;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// HEC delivery errors. These are never fatal to a run.
#[derive(Debug, thiserror::Error)]
pub enum HecError {
    #[error("HEC request failed: {0}")]
    Transport(String),

    #[error("HEC rejected event (HTTP {status}): {text}")]
    Rejected { status: u16, text: String },
}

/// Event envelope posted to the collector.
#[derive(Debug, Serialize)]
pub struct HecEvent<'a> {
    /// Gallons, or `null` when the query produced nothing.
    pub event: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sourcetype: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct HecResponse {
    #[serde(default)]
    text: Option<String>,
}

/// Client for one collector endpoint.
#[derive(Clone)]
pub struct HecClient {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    index: Option<String>,
    sourcetype: Option<String>,
}

impl HecClient {
    pub fn new(
        hec_url: &str,
        token: impl Into<String>,
        index: Option<String>,
        sourcetype: Option<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building HEC HTTP client")?;

        Ok(Self {
            http,
            endpoint: format!("{}/services/collector/event", hec_url.trim_end_matches('/')),
            token: token.into(),
            index,
            sourcetype,
        })
    }

    /// Collector client if both HEC URL and token are configured.
    pub fn from_config(config: &Config) -> anyhow::Result<Option<Self>> {
        let Some((url, token)) = config.hec_endpoint() else {
            return Ok(None);
        };

        Self::new(
            url,
            token,
            config.hec_index.clone(),
            config.hec_sourcetype.clone(),
            config.http_timeout,
        )
        .map(Some)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Build the event envelope for a value.
    pub fn event(&self, value: FlowValue) -> HecEvent<'_> {
        HecEvent {
            event: value.gallons(),
            index: self.index.as_deref(),
            sourcetype: self.sourcetype.as_deref(),
        }
    }

    /// Post one event. Succeeds only if the collector answers `"Success"`.
    pub async fn send(&self, value: FlowValue) -> Result<(), HecError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, format!("Splunk {}", self.token))
            .json(&self.event(value))
            .send()
            .await
            .map_err(|e| HecError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| HecError::Transport(e.to_string()))?;

        let text = serde_json::from_str::<HecResponse>(&body)
            .ok()
            .and_then(|r| r.text);

        match text.as_deref() {
            Some("Success") => Ok(()),
            other => Err(HecError::Rejected {
                status: status.as_u16(),
                text: other.map(str::to_string).unwrap_or(body),
            }),
        }
    }
}
