// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Mode handlers. Each run executes exactly one of these, start to finish.

use crate::config::Mode;
use crate::error::AppError;
use crate::services::{resolve_user_id, TokenStore};
use crate::AppState;
use std::io::Write;

/// Separator printed above the details block.
const DETAILS_RULE: &str = "-------------------------------------------";

/// Run the configured mode. `out` stands in for stdout.
pub async fn run<W: Write>(state: &AppState, out: &mut W) -> Result<(), AppError> {
    match state.config.mode {
        Mode::Auth => auth(state).await,
        Mode::Renew => renew(state).await,
        Mode::Details => details(state, out).await,
        Mode::Query => query(state, out).await,
    }
}

/// Obtain a token pair by password grant (saved if --tokenfile is set).
async fn auth(state: &AppState) -> Result<(), AppError> {
    tracing::info!("Getting auth token");
    state.auth.obtain_by_password(&state.config).await?;
    Ok(())
}

/// Renew the stored token pair and write it back.
async fn renew(state: &AppState) -> Result<(), AppError> {
    let store = TokenStore::from_config(&state.config)?;
    let current = store.load()?;

    state
        .auth
        .renew_by_refresh_token(&state.config, &current.refresh_token, &store)
        .await?;
    Ok(())
}

/// Print tokens, user id, bridge device id and whether the token still works.
async fn details<W: Write>(state: &AppState, out: &mut W) -> Result<(), AppError> {
    let credential = TokenStore::from_config(&state.config)?.load()?;
    let identity = resolve_user_id(&credential.access_token)?;
    let device = state
        .identity
        .resolve_device_id(identity, &credential.access_token)
        .await?;
    let token_valid = state
        .identity
        .check_token(identity, &credential.access_token)
        .await?;

    let report = format!(
        "{}\nAccess Token: {}\nRefresh Token: {}\nUser ID: {}\nDevice ID: {}\nToken Valid: {}\n",
        DETAILS_RULE,
        credential.access_token,
        credential.refresh_token,
        identity.user_id,
        device.device_id,
        token_valid
    );

    out.write_all(report.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| AppError::io("<stdout>", e))
}

/// Query the last minute of usage and deliver it.
async fn query<W: Write>(state: &AppState, out: &mut W) -> Result<(), AppError> {
    let credential = TokenStore::from_config(&state.config)?.load()?;
    let identity = resolve_user_id(&credential.access_token)?;
    let device = state
        .identity
        .resolve_device_id(identity, &credential.access_token)
        .await?;

    let reading = state
        .usage
        .query_last_minute(identity, &device, &credential.access_token)
        .await;

    state.sink.deliver(&reading, out).await
}
