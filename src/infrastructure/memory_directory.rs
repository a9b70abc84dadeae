// In-memory device directory - Fixed device table for embedding hosts and tests
use crate::application::device_directory::{DeviceDirectory, DirectoryError};
use crate::domain::device::DeviceInfo;
use std::collections::HashMap;

type DeviceKey = (String, String);

fn key(account_id: &str, device_id: &str) -> DeviceKey {
    (account_id.to_string(), device_id.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDeviceDirectory {
    devices: HashMap<DeviceKey, DeviceInfo>,
    last_events: HashMap<DeviceKey, i64>,
}

impl InMemoryDeviceDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a JSON array of device records.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let devices: Vec<DeviceInfo> = serde_json::from_str(text)?;
        Ok(devices
            .into_iter()
            .fold(Self::new(), |directory, device| directory.with_device(device)))
    }

    pub fn with_device(mut self, device: DeviceInfo) -> Self {
        self.devices
            .insert(key(&device.account_id, &device.device_id), device);
        self
    }

    pub fn with_last_event(mut self, account_id: &str, device_id: &str, timestamp: i64) -> Self {
        self.last_events.insert(key(account_id, device_id), timestamp);
        self
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

impl DeviceDirectory for InMemoryDeviceDirectory {
    fn device(&self, account_id: &str, device_id: &str) -> Result<Option<DeviceInfo>, DirectoryError> {
        Ok(self.devices.get(&key(account_id, device_id)).cloned())
    }

    fn last_event_timestamp(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<Option<i64>, DirectoryError> {
        Ok(self.last_events.get(&key(account_id, device_id)).copied())
    }
}
