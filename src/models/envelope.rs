//! Flume API response envelope.

use crate::error::AppError;
use serde::de::DeserializeOwned;
use serde::Deserialize;

/// Wrapper every Flume endpoint returns.
///
/// The envelope carries its own `http_code`, which is what callers check.
/// `data` is kept untyped until that check passes, because error
/// responses do not follow the success shape.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope {
    pub http_code: u16,
    #[serde(default)]
    pub http_message: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl ApiEnvelope {
    pub fn is_ok(&self) -> bool {
        self.http_code == 200
    }

    /// Short description of a failed envelope for error messages.
    pub fn describe(&self) -> String {
        let detail = self
            .message
            .as_deref()
            .or(self.http_message.as_deref())
            .unwrap_or("no message");
        format!("http_code {}: {}", self.http_code, detail)
    }

    /// Decode `data` as a list of `T`. A missing or null `data` is empty.
    pub fn into_data<T: DeserializeOwned>(self) -> Result<Vec<T>, AppError> {
        match self.data {
            None | Some(serde_json::Value::Null) => Ok(Vec::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| AppError::Parse(format!("unexpected data shape: {}", e))),
        }
    }

    /// Decode the first element of `data`.
    pub fn first<T: DeserializeOwned>(self) -> Result<T, AppError> {
        self.into_data::<T>()?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Parse("response data is empty".to_string()))
    }
}
