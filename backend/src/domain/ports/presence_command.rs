//! Driving port for presence heartbeats.

use async_trait::async_trait;

use crate::domain::{DeviceId, Error, Heartbeat};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresenceCommand: Send + Sync {
    /// Record a heartbeat at the current time.
    async fn heartbeat(&self, heartbeat: Heartbeat) -> Result<(), Error>;

    /// Forget a device immediately.
    async fn offline(&self, device_id: &DeviceId) -> Result<(), Error>;
}

/// Fixture implementation discarding every signal.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePresenceCommand;

#[async_trait]
impl PresenceCommand for FixturePresenceCommand {
    async fn heartbeat(&self, _heartbeat: Heartbeat) -> Result<(), Error> {
        Ok(())
    }

    async fn offline(&self, _device_id: &DeviceId) -> Result<(), Error> {
        Ok(())
    }
}
