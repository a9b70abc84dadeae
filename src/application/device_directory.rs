// Directory trait for device lookups made from inside column resolvers
use crate::domain::device::DeviceInfo;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("device lookup failed for {account_id}/{device_id}: {reason}")]
    Lookup {
        account_id: String,
        device_id: String,
        reason: String,
    },

    #[error("device directory unavailable: {0}")]
    Unavailable(String),
}

/// Blocking lookups, no retry. Callers treat any error as "value unknown".
pub trait DeviceDirectory: Send + Sync {
    /// Device record, or `None` when the device does not exist
    fn device(&self, account_id: &str, device_id: &str)
    -> Result<Option<DeviceInfo>, DirectoryError>;

    /// Timestamp of the newest stored event for the device (epoch seconds)
    fn last_event_timestamp(
        &self,
        account_id: &str,
        device_id: &str,
    ) -> Result<Option<i64>, DirectoryError>;
}
