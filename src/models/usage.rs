//! Usage query request/response and reading models.

use crate::models::{DeviceSelection, Identity};
use crate::time_utils::{format_naive, previous_minute};
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Request id tag used to find the result in the response.
pub const PER_MINUTE_REQUEST_ID: &str = "perminute";

/// `[since, until]` bounds of a usage query, in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub since: NaiveDateTime,
    pub until: NaiveDateTime,
}

impl QueryWindow {
    /// The minute ending at `now`.
    pub fn last_minute_before(now: NaiveDateTime) -> Self {
        Self {
            since: previous_minute(now),
            until: now,
        }
    }

    /// The minute ending at the current local time.
    pub fn last_minute() -> Self {
        Self::last_minute_before(Local::now().naive_local())
    }
}

/// Body of a POST to `/users/{user}/devices/{device}/query`.
#[derive(Debug, Clone, Serialize)]
pub struct UsageQueryRequest {
    pub queries: Vec<UsageQuerySpec>,
}

/// One aggregation query within a [`UsageQueryRequest`].
#[derive(Debug, Clone, Serialize)]
pub struct UsageQuerySpec {
    pub request_id: String,
    pub bucket: String,
    pub since_datetime: String,
    pub until_datetime: String,
    pub group_multiplier: String,
    pub operation: String,
    pub sort_direction: String,
    pub units: String,
}

impl UsageQueryRequest {
    /// Gallons summed over one-minute buckets for `window`.
    pub fn per_minute(window: &QueryWindow) -> Self {
        Self {
            queries: vec![UsageQuerySpec {
                request_id: PER_MINUTE_REQUEST_ID.to_string(),
                bucket: "MIN".to_string(),
                since_datetime: format_naive(window.since),
                until_datetime: format_naive(window.until),
                group_multiplier: "1".to_string(),
                operation: "SUM".to_string(),
                sort_direction: "ASC".to_string(),
                units: "GALLONS".to_string(),
            }],
        }
    }
}

/// One aggregation bucket in a query result.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryBucket {
    #[serde(default)]
    pub datetime: Option<String>,
    pub value: f64,
}

/// A measured flow, or the marker for a query that produced nothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlowValue {
    Gallons(f64),
    Absent,
}

impl FlowValue {
    pub fn gallons(&self) -> Option<f64> {
        match self {
            FlowValue::Gallons(g) => Some(*g),
            FlowValue::Absent => None,
        }
    }
}

impl fmt::Display for FlowValue {
    /// Gallons always keep a fractional part (`3.0`, not `3`) and an absent
    /// value prints as `None`, which is what downstream log parsers match.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlowValue::Gallons(g) => write!(f, "{:?}", g),
            FlowValue::Absent => f.write_str("None"),
        }
    }
}

/// Result of a usage query, ready for the sink.
#[derive(Debug, Clone, PartialEq)]
pub struct UsageReading {
    pub identity: Identity,
    pub device: DeviceSelection,
    pub window: QueryWindow,
    pub value: FlowValue,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_per_minute_request_body() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(12, 30, 15)
            .unwrap();
        let window = QueryWindow::last_minute_before(now);

        let body = serde_json::to_value(UsageQueryRequest::per_minute(&window)).unwrap();

        assert_eq!(
            body,
            json!({"queries": [{
                "request_id": "perminute",
                "bucket": "MIN",
                "since_datetime": "2024-06-01 12:29:15",
                "until_datetime": "2024-06-01 12:30:15",
                "group_multiplier": "1",
                "operation": "SUM",
                "sort_direction": "ASC",
                "units": "GALLONS",
            }]})
        );
    }

    #[test]
    fn test_flow_value_display() {
        assert_eq!(FlowValue::Gallons(3.2).to_string(), "3.2");
        assert_eq!(FlowValue::Gallons(0.0).to_string(), "0.0");
        assert_eq!(FlowValue::Absent.to_string(), "None");
    }
}
