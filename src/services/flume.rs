// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Flume API client.
//!
//! Handles:
//! - OAuth token exchange (password and refresh grants)
//! - User and device lookups
//! - Device usage queries
//!
//! Flume wraps every response in an envelope with its own `http_code`.
//! This client only decodes the envelope; callers decide what a non-200
//! envelope means for them.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{ApiEnvelope, TokenRequest, UsageQueryRequest};
use anyhow::Context;
use std::time::Duration;

/// Flume API client.
#[derive(Clone)]
pub struct FlumeClient {
    http: reqwest::Client,
    base_url: String,
}

impl FlumeClient {
    /// Create a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed building Flume HTTP client")?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.api_url.clone(), config.http_timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange a grant for a token pair.
    ///
    /// POST {base}/oauth/token
    ///
    /// A non-success HTTP status is an authentication failure regardless of
    /// what the body says.
    pub async fn request_token(&self, request: &TokenRequest) -> Result<ApiEnvelope, AppError> {
        let url = format!("{}/oauth/token", self.base_url);
        tracing::debug!(grant_type = request.grant_type(), "Requesting Flume token");

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::VendorApi(format!("Token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "Flume token request rejected");
            return Err(AppError::Authentication(format!(
                "token endpoint returned HTTP {}",
                status
            )));
        }

        self.read_envelope(response).await
    }

    /// Fetch the user resource. Used as a cheap check that a token is accepted.
    pub async fn get_user(&self, access_token: &str, user_id: u64) -> Result<ApiEnvelope, AppError> {
        let url = format!("{}/users/{}", self.base_url, user_id);
        self.get_envelope(&url, access_token).await
    }

    /// List the devices registered to a user.
    pub async fn list_devices(
        &self,
        access_token: &str,
        user_id: u64,
    ) -> Result<ApiEnvelope, AppError> {
        let url = format!("{}/users/{}/devices", self.base_url, user_id);
        self.get_envelope(&url, access_token).await
    }

    /// Run an aggregation query against one device.
    pub async fn query_device(
        &self,
        access_token: &str,
        user_id: u64,
        device_id: &str,
        request: &UsageQueryRequest,
    ) -> Result<ApiEnvelope, AppError> {
        let url = format!(
            "{}/users/{}/devices/{}/query",
            self.base_url,
            user_id,
            urlencoding::encode(device_id)
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(access_token)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::VendorApi(e.to_string()))?;

        self.read_envelope(response).await
    }

    /// Generic authenticated GET returning the envelope.
    async fn get_envelope(&self, url: &str, access_token: &str) -> Result<ApiEnvelope, AppError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| AppError::VendorApi(e.to_string()))?;

        self.read_envelope(response).await
    }

    /// Decode the Flume envelope from any response status.
    async fn read_envelope(&self, response: reqwest::Response) -> Result<ApiEnvelope, AppError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::VendorApi(format!("Failed reading response body: {}", e)))?;

        let envelope: ApiEnvelope = serde_json::from_str(&body).map_err(|e| {
            AppError::Parse(format!("unexpected Flume response (HTTP {}): {}", status, e))
        })?;

        tracing::debug!(
            status = %status,
            http_code = envelope.http_code,
            "Flume response received"
        );
        Ok(envelope)
    }
}
