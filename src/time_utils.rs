// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta};

/// Second-precision local timestamp format used by the Flume query API
/// and by sink lines.
pub const LOCAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a local timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_local(date: DateTime<Local>) -> String {
    format_naive(date.naive_local())
}

/// Format a naive (already local) timestamp as `YYYY-MM-DD HH:MM:SS`.
pub fn format_naive(date: NaiveDateTime) -> String {
    date.format(LOCAL_TIMESTAMP_FORMAT).to_string()
}

/// Current local time formatted for a sink line.
pub fn now_local() -> String {
    format_local(Local::now())
}

/// The minute immediately preceding `now`.
pub fn previous_minute(now: NaiveDateTime) -> NaiveDateTime {
    now - TimeDelta::minutes(1)
}
