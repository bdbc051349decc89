//! Presence heartbeats and the online counter.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    PresenceCommand, PresenceQuery, PresenceRepository, PresenceRepositoryError,
};
use crate::domain::{DeviceId, Error, Heartbeat, OnlineCount, PresenceWindow, count_online};

/// Presence service implementing the presence driving ports.
#[derive(Clone)]
pub struct PresenceService<P> {
    presence: Arc<P>,
    clock: Arc<dyn Clock>,
    window: PresenceWindow,
}

impl<P> PresenceService<P> {
    pub fn new(presence: Arc<P>, clock: Arc<dyn Clock>, window: PresenceWindow) -> Self {
        Self {
            presence,
            clock,
            window,
        }
    }
}

fn map_presence_error(error: PresenceRepositoryError) -> Error {
    match error {
        PresenceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("presence repository unavailable: {message}"))
        }
        PresenceRepositoryError::Query { message } => {
            Error::internal(format!("presence repository error: {message}"))
        }
    }
}

#[async_trait]
impl<P> PresenceCommand for PresenceService<P>
where
    P: PresenceRepository,
{
    async fn heartbeat(&self, heartbeat: Heartbeat) -> Result<(), Error> {
        self.presence
            .record(&heartbeat, self.clock.utc())
            .await
            .map_err(map_presence_error)
    }

    async fn offline(&self, device_id: &DeviceId) -> Result<(), Error> {
        self.presence
            .remove(device_id)
            .await
            .map_err(map_presence_error)
    }
}

#[async_trait]
impl<P> PresenceQuery for PresenceService<P>
where
    P: PresenceRepository,
{
    async fn online_count(&self) -> Result<OnlineCount, Error> {
        let threshold = self.window.threshold(self.clock.utc());
        let records = self
            .presence
            .list_since(threshold)
            .await
            .map_err(map_presence_error)?;
        let online = count_online(&records);
        debug!(rows = records.len(), online, "counted online presence");
        Ok(OnlineCount {
            online,
            window_seconds: self.window.as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockPresenceRepository;
    use crate::domain::test_fixtures::{fixture_clock, fixture_timestamp};
    use crate::domain::{ErrorCode, PresenceRecord, UserId};
    use chrono::Duration;

    fn device(raw: &str) -> DeviceId {
        DeviceId::new(raw).expect("device id")
    }

    fn record(raw: &str, user: Option<i32>, agent: Option<&str>) -> PresenceRecord {
        PresenceRecord {
            device_id: device(raw),
            user_id: user.map(UserId::new),
            user_agent: agent.map(str::to_owned),
            last_seen_at: fixture_timestamp(),
        }
    }

    fn service(repo: MockPresenceRepository, window: u64) -> PresenceService<MockPresenceRepository> {
        PresenceService::new(
            Arc::new(repo),
            fixture_clock(),
            PresenceWindow::from_secs(window),
        )
    }

    #[tokio::test]
    async fn heartbeat_is_stamped_with_the_clock() {
        let mut repo = MockPresenceRepository::new();
        repo.expect_record()
            .withf(|heartbeat: &Heartbeat, seen_at| {
                heartbeat.device_id.as_ref() == "tab-1" && *seen_at == fixture_timestamp()
            })
            .times(1)
            .return_once(|_, _| Ok(()));

        service(repo, 120)
            .heartbeat(Heartbeat::new(device("tab-1"), None, None))
            .await
            .expect("recorded");
    }

    #[tokio::test]
    async fn online_count_uses_the_window_threshold_and_dedups() {
        let mut repo = MockPresenceRepository::new();
        repo.expect_list_since()
            .withf(|threshold| *threshold == fixture_timestamp() - Duration::seconds(60))
            .return_once(|_| {
                Ok(vec![
                    record("a", Some(1), Some("Firefox")),
                    record("b", Some(1), Some(" firefox ")),
                    record("c", Some(1), None),
                    record("d", None, Some("Firefox")),
                ])
            });

        let count = service(repo, 60).online_count().await.expect("count");

        assert_eq!(count.online, 3);
        assert_eq!(count.window_seconds, 60);
    }

    #[tokio::test]
    async fn tiny_windows_are_raised_to_the_floor() {
        let mut repo = MockPresenceRepository::new();
        repo.expect_list_since().return_once(|_| Ok(Vec::new()));

        let count = service(repo, 1).online_count().await.expect("count");

        assert_eq!(count.window_seconds, 30);
        assert_eq!(count.online, 0);
    }

    #[tokio::test]
    async fn connection_failures_are_service_unavailable() {
        let mut repo = MockPresenceRepository::new();
        repo.expect_remove()
            .return_once(|_| Err(PresenceRepositoryError::connection("pool closed")));

        let err = service(repo, 120)
            .offline(&device("tab-1"))
            .await
            .expect_err("unavailable");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
