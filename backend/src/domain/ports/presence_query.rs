//! Driving port for the online counter.

use async_trait::async_trait;

use crate::domain::{Error, OnlineCount, PresenceWindow};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PresenceQuery: Send + Sync {
    /// Distinct online entities inside the configured window.
    async fn online_count(&self) -> Result<OnlineCount, Error>;
}

/// Fixture implementation reporting nobody online.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePresenceQuery;

#[async_trait]
impl PresenceQuery for FixturePresenceQuery {
    async fn online_count(&self) -> Result<OnlineCount, Error> {
        Ok(OnlineCount {
            online: 0,
            window_seconds: PresenceWindow::default().as_secs(),
        })
    }
}
