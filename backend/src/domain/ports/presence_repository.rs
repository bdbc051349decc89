//! Port for device presence records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DeviceId, Heartbeat, PresenceRecord};

use super::define_port_error;

define_port_error! {
    /// Errors raised by presence repository adapters.
    pub enum PresenceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "presence repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "presence repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresenceRepository: Send + Sync {
    /// Upsert by device id, merging with the stored row via
    /// [`Heartbeat::apply_to`].
    async fn record(
        &self,
        heartbeat: &Heartbeat,
        seen_at: DateTime<Utc>,
    ) -> Result<(), PresenceRepositoryError>;

    /// Delete the device's record if present.
    async fn remove(&self, device_id: &DeviceId) -> Result<(), PresenceRepositoryError>;

    /// Records last seen at or after `threshold`.
    async fn list_since(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<PresenceRecord>, PresenceRepositoryError>;
}
