//! OAuth credential model and token endpoint requests.

use serde::{Deserialize, Serialize};

/// Flume OAuth token pair.
///
/// This is both the token file record and the shape of each element of
/// the token endpoint's `data` array (extra fields such as `expires_in`
/// are ignored).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub access_token: String,
    pub refresh_token: String,
}

/// Body of a POST to the Flume token endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "grant_type", rename_all = "snake_case")]
pub enum TokenRequest {
    Password {
        client_id: String,
        client_secret: String,
        username: String,
        password: String,
    },
    RefreshToken {
        refresh_token: String,
        client_id: String,
        client_secret: String,
    },
}

impl TokenRequest {
    /// Grant type name, for logging.
    pub fn grant_type(&self) -> &'static str {
        match self {
            TokenRequest::Password { .. } => "password",
            TokenRequest::RefreshToken { .. } => "refresh_token",
        }
    }
}
