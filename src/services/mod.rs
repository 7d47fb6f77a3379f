// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod auth;
pub mod flume;
pub mod hec;
pub mod identity;
pub mod sink;
pub mod token_store;
pub mod usage;

pub use auth::AuthClient;
pub use flume::FlumeClient;
pub use hec::{HecClient, HecError};
pub use identity::{decode_claims_unverified, resolve_user_id, IdentityResolver};
pub use sink::Sink;
pub use token_store::TokenStore;
pub use usage::UsageQuery;
