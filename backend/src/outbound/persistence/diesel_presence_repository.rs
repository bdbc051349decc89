//! PostgreSQL-backed device presence store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{PresenceRepository, PresenceRepositoryError};
use crate::domain::{DeviceId, Heartbeat, PresenceRecord, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::OnlineDeviceRow;
use super::pool::{DbPool, PoolError};
use super::schema::online_devices;

/// Diesel-backed implementation of the presence port.
#[derive(Clone)]
pub struct DieselPresenceRepository {
    pool: DbPool,
}

impl DieselPresenceRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PresenceRepositoryError {
    map_basic_pool_error(error, PresenceRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PresenceRepositoryError {
    map_basic_diesel_error(
        error,
        PresenceRepositoryError::query,
        PresenceRepositoryError::connection,
    )
}

fn row_with_device(device_id: DeviceId, row: OnlineDeviceRow) -> PresenceRecord {
    PresenceRecord {
        device_id,
        user_id: row.user_id.map(UserId::new),
        user_agent: row.user_agent,
        last_seen_at: row.last_seen_at,
    }
}

fn row_to_record(row: OnlineDeviceRow) -> Result<PresenceRecord, PresenceRepositoryError> {
    let device_id = DeviceId::new(&row.device_id)
        .map_err(|err| PresenceRepositoryError::query(format!("stored device id: {err}")))?;
    Ok(row_with_device(device_id, row))
}

fn record_to_row(record: PresenceRecord) -> OnlineDeviceRow {
    OnlineDeviceRow {
        device_id: String::from(record.device_id),
        user_id: record.user_id.map(UserId::get),
        user_agent: record.user_agent,
        last_seen_at: record.last_seen_at,
    }
}

#[async_trait]
impl PresenceRepository for DieselPresenceRepository {
    async fn record(
        &self,
        heartbeat: &Heartbeat,
        seen_at: DateTime<Utc>,
    ) -> Result<(), PresenceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let existing = online_devices::table
                    .find(heartbeat.device_id.as_ref())
                    .select(OnlineDeviceRow::as_select())
                    .for_update()
                    .first::<OnlineDeviceRow>(conn)
                    .await
                    .optional()?
                    .map(|row| row_with_device(heartbeat.device_id.clone(), row));
                let row = record_to_row(heartbeat.apply_to(existing.as_ref(), seen_at));
                diesel::insert_into(online_devices::table)
                    .values(&row)
                    .on_conflict(online_devices::device_id)
                    .do_update()
                    .set(&row)
                    .execute(conn)
                    .await
                    .map(|_| ())
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn remove(&self, device_id: &DeviceId) -> Result<(), PresenceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(online_devices::table.find(device_id.as_ref()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn list_since(
        &self,
        threshold: DateTime<Utc>,
    ) -> Result<Vec<PresenceRecord>, PresenceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<OnlineDeviceRow> = online_devices::table
            .filter(online_devices::last_seen_at.ge(threshold))
            .select(OnlineDeviceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_record).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(device_id: &str) -> OnlineDeviceRow {
        OnlineDeviceRow {
            device_id: device_id.to_owned(),
            user_id: Some(4),
            user_agent: Some("Firefox".to_owned()),
            last_seen_at: Utc::now(),
        }
    }

    #[rstest]
    fn stored_rows_round_trip_through_records() {
        let original = row("tab-1");
        let record = row_to_record(original.clone()).expect("valid row");
        assert_eq!(record.user_id, Some(UserId::new(4)));

        let back = record_to_row(record);
        assert_eq!(back.device_id, original.device_id);
        assert_eq!(back.user_agent, original.user_agent);
    }

    #[rstest]
    fn blank_stored_device_ids_are_query_errors() {
        let err = row_to_record(row("  ")).expect_err("blank id");
        assert!(matches!(err, PresenceRepositoryError::Query { .. }));
    }
}
