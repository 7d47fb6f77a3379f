//! Identity and device models.

use serde::{Deserialize, Deserializer};

/// Flume device type code for the bridge that relays sensor readings.
pub const BRIDGE_DEVICE_TYPE: i64 = 2;

/// Claims carried in a Flume access token. Only `user_id` is used.
#[derive(Debug, Clone, Deserialize)]
pub struct FlumeClaims {
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub user_id: u64,
}

/// The calling user, derived from the access token on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: u64,
}

/// A device registered to the user, as returned by the device list.
#[derive(Debug, Clone, Deserialize)]
pub struct Device {
    #[serde(deserialize_with = "string_from_number_or_string")]
    pub id: String,
    #[serde(rename = "type")]
    pub kind: i64,
}

impl Device {
    pub fn is_bridge(&self) -> bool {
        self.kind == BRIDGE_DEVICE_TYPE
    }
}

/// The device usage queries are issued against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceSelection {
    pub device_id: String,
}

impl DeviceSelection {
    /// Pick the first bridge in list order.
    pub fn first_bridge(devices: &[Device]) -> Option<Self> {
        devices.iter().find(|d| d.is_bridge()).map(|d| Self {
            device_id: d.id.clone(),
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

fn string_from_number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n.to_string(),
        NumberOrString::String(s) => s,
    })
}

fn u64_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => n
            .as_u64()
            .ok_or_else(|| D::Error::custom(format!("user_id {} is not a positive integer", n))),
        NumberOrString::String(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("user_id {:?} is not numeric", s))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn devices(value: serde_json::Value) -> Vec<Device> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_first_bridge_in_list_order() {
        let list = devices(json!([
            {"id": "1001", "type": 1},
            {"id": "1002", "type": 2},
            {"id": "1003", "type": 2},
        ]));

        let selected = DeviceSelection::first_bridge(&list).unwrap();
        assert_eq!(selected.device_id, "1002");
    }

    #[test]
    fn test_no_bridge() {
        let list = devices(json!([{"id": "1001", "type": 1}]));
        assert!(DeviceSelection::first_bridge(&list).is_none());
        assert!(DeviceSelection::first_bridge(&[]).is_none());
    }

    #[test]
    fn test_numeric_device_id_is_kept_as_string() {
        let list = devices(json!([{"id": 6248148189204194987u64, "type": 2}]));
        assert_eq!(list[0].id, "6248148189204194987");
    }

    #[test]
    fn test_claims_user_id_number_or_string() {
        let claims: FlumeClaims = serde_json::from_value(json!({"user_id": 7})).unwrap();
        assert_eq!(claims.user_id, 7);

        let claims: FlumeClaims = serde_json::from_value(json!({"user_id": "11382"})).unwrap();
        assert_eq!(claims.user_id, 11382);

        assert!(serde_json::from_value::<FlumeClaims>(json!({"user_id": "abc"})).is_err());
    }
}
