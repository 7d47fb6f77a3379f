// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-minute water usage query.
//!
//! A failed query never fails the run: it yields [`FlowValue::Absent`] so
//! a scheduled invocation still emits its line.

use crate::error::AppError;
use crate::models::usage::PER_MINUTE_REQUEST_ID;
use crate::models::{
    DeviceSelection, FlowValue, Identity, QueryBucket, QueryWindow, UsageQueryRequest,
    UsageReading,
};
use crate::services::FlumeClient;
use std::collections::HashMap;

/// Issues usage aggregation queries for the selected device.
#[derive(Clone)]
pub struct UsageQuery {
    client: FlumeClient,
}

impl UsageQuery {
    pub fn new(client: FlumeClient) -> Self {
        Self { client }
    }

    /// Gallons used in the minute ending now.
    pub async fn query_last_minute(
        &self,
        identity: Identity,
        device: &DeviceSelection,
        access_token: &str,
    ) -> UsageReading {
        self.query_window(identity, device, access_token, QueryWindow::last_minute())
            .await
    }

    /// Gallons used within `window`.
    pub async fn query_window(
        &self,
        identity: Identity,
        device: &DeviceSelection,
        access_token: &str,
        window: QueryWindow,
    ) -> UsageReading {
        let value = match self.fetch(identity, device, access_token, &window).await {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    user_id = identity.user_id,
                    device_id = %device.device_id,
                    "Usage query failed"
                );
                FlowValue::Absent
            }
        };

        UsageReading {
            identity,
            device: device.clone(),
            window,
            value,
        }
    }

    async fn fetch(
        &self,
        identity: Identity,
        device: &DeviceSelection,
        access_token: &str,
        window: &QueryWindow,
    ) -> Result<FlowValue, AppError> {
        let request = UsageQueryRequest::per_minute(window);
        let envelope = self
            .client
            .query_device(access_token, identity.user_id, &device.device_id, &request)
            .await?;

        if !envelope.is_ok() {
            tracing::warn!(result = %envelope.describe(), "Usage query not successful");
            return Ok(FlowValue::Absent);
        }

        let results: Vec<HashMap<String, Vec<QueryBucket>>> = envelope.into_data()?;
        let bucket = results
            .into_iter()
            .next()
            .and_then(|mut result| result.remove(PER_MINUTE_REQUEST_ID))
            .and_then(|buckets| buckets.into_iter().next());

        match bucket {
            Some(bucket) => {
                tracing::debug!(
                    datetime = bucket.datetime.as_deref().unwrap_or("<none>"),
                    value = bucket.value,
                    "Usage bucket received"
                );
                Ok(FlowValue::Gallons(bucket.value))
            }
            None => {
                tracing::warn!("Usage query returned no per-minute bucket");
                Ok(FlowValue::Absent)
            }
        }
    }
}
