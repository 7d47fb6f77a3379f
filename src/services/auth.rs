// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential lifecycle: obtain a token pair by password, renew it by
//! refresh token, and persist whichever was issued last.

use crate::config::Config;
use crate::error::AppError;
use crate::models::{Credential, TokenRequest};
use crate::services::{FlumeClient, TokenStore};

/// OAuth client for the Flume token endpoint.
#[derive(Clone)]
pub struct AuthClient {
    client: FlumeClient,
}

impl AuthClient {
    pub fn new(client: FlumeClient) -> Self {
        Self { client }
    }

    /// Exchange username/password for a token pair.
    ///
    /// All four of client id, client secret, username and password must be
    /// configured; otherwise this fails before any request is made. When a
    /// token file is configured the new credential is written to it.
    pub async fn obtain_by_password(&self, config: &Config) -> Result<Credential, AppError> {
        let grant = config.password_grant()?;
        tracing::debug!("All required parameters present for password grant");

        let credential = self.exchange(&grant).await?;

        match config.token_file.as_ref() {
            Some(path) => TokenStore::new(path).save(&credential)?,
            None => tracing::warn!("No --tokenfile configured, token not saved"),
        }

        Ok(credential)
    }

    /// Exchange a refresh token for a new token pair and replace the
    /// stored credential with it.
    pub async fn renew_by_refresh_token(
        &self,
        config: &Config,
        refresh_token: &str,
        store: &TokenStore,
    ) -> Result<Credential, AppError> {
        let grant = config.refresh_grant(refresh_token)?;

        let credential = self.exchange(&grant).await?;
        store.save(&credential)?;

        tracing::info!("Access token renewed");
        Ok(credential)
    }

    /// POST the grant and take the first credential from a 200 envelope.
    async fn exchange(&self, grant: &TokenRequest) -> Result<Credential, AppError> {
        let envelope = self.client.request_token(grant).await?;

        if !envelope.is_ok() {
            tracing::error!(
                grant_type = grant.grant_type(),
                http_code = envelope.http_code,
                "Flume rejected token request"
            );
            return Err(AppError::Authentication(envelope.describe()));
        }

        tracing::debug!(grant_type = grant.grant_type(), "Got 200 response from token request");
        envelope.first()
    }
}
