// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the Flume API, the token file and usage readings.

pub mod credential;
pub mod device;
pub mod envelope;
pub mod usage;

pub use credential::{Credential, TokenRequest};
pub use device::{Device, DeviceSelection, FlumeClaims, Identity, BRIDGE_DEVICE_TYPE};
pub use envelope::ApiEnvelope;
pub use usage::{FlowValue, QueryBucket, QueryWindow, UsageQueryRequest, UsageReading};
