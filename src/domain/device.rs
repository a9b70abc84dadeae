// Device domain model (the related entity some columns look up)
use serde::Deserialize;
use std::collections::HashMap;

/// Timestamps at or below this value (2000-01-01 UTC) are treated as unset.
pub const MINIMUM_REASONABLE_TIMESTAMP: i64 = 946_684_800;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeviceInfo {
    pub account_id: String,
    pub device_id: String,
    pub description: String,
    pub vehicle_id: String,
    pub group_id: String,
    /// Fraction (0..1], or an integer percent when above 1.
    pub last_battery_level: f64,
    pub fuel_capacity_liters: f64,
    /// Epoch seconds of the last connection, 0 when unknown.
    pub last_connect_time: i64,
    pub odometer_offset_km: f64,
    pub engine_hours_offset: f64,
    pub custom: HashMap<String, String>,
}

impl DeviceInfo {
    pub fn new(account_id: impl Into<String>, device_id: impl Into<String>) -> Self {
        Self {
            account_id: account_id.into(),
            device_id: device_id.into(),
            ..Self::default()
        }
    }

    pub fn custom_attribute(&self, name: &str) -> Option<&str> {
        self.custom
            .get(name.trim())
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn has_reasonable_connect_time(&self) -> bool {
        self.last_connect_time > MINIMUM_REASONABLE_TIMESTAMP
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_custom_attribute() {
        let mut device = DeviceInfo::new("acme", "truck1");
        device.custom.insert("color".to_string(), "blue".to_string());
        device.custom.insert("empty".to_string(), "  ".to_string());
        assert_eq!(device.custom_attribute(" color "), Some("blue"));
        assert_eq!(device.custom_attribute("empty"), None);
        assert_eq!(device.custom_attribute("missing"), None);
    }

    #[test]
    fn test_connect_time() {
        let mut device = DeviceInfo::new("acme", "truck1");
        assert!(!device.has_reasonable_connect_time());
        device.last_connect_time = 1_700_000_000;
        assert!(device.has_reasonable_connect_time());
    }
}
