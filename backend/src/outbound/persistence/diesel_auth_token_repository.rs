//! PostgreSQL-backed `AuthTokenRepository` implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AuthTokenRepository, AuthTokenRepositoryError};
use crate::domain::{AuthToken, User, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewAuthTokenRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{auth_tokens, users};

/// Diesel-backed implementation of the token port.
#[derive(Clone)]
pub struct DieselAuthTokenRepository {
    pool: DbPool,
}

impl DieselAuthTokenRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> AuthTokenRepositoryError {
    map_basic_pool_error(error, AuthTokenRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> AuthTokenRepositoryError {
    map_basic_diesel_error(
        error,
        AuthTokenRepositoryError::query,
        AuthTokenRepositoryError::connection,
    )
}

#[async_trait]
impl AuthTokenRepository for DieselAuthTokenRepository {
    async fn insert(
        &self,
        token: &AuthToken,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(auth_tokens::table)
            .values(&NewAuthTokenRow {
                token: token.as_str(),
                user_id: user_id.get(),
                created_at: issued_at,
                last_seen_at: issued_at,
            })
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn resolve(
        &self,
        token: &AuthToken,
        seen_at: DateTime<Utc>,
    ) -> Result<Option<User>, AuthTokenRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner = diesel::update(auth_tokens::table.find(token.as_str()))
            .set(auth_tokens::last_seen_at.eq(seen_at))
            .returning(auth_tokens::user_id)
            .get_result::<i32>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(owner) = owner else {
            return Ok(None);
        };

        let row = users::table
            .find(owner)
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            let username = Username::new(&row.username).map_err(|err| {
                AuthTokenRepositoryError::query(format!("stored username: {err}"))
            })?;
            Ok(User {
                id: UserId::new(row.id),
                username,
                is_admin: row.is_admin,
            })
        })
        .transpose()
    }
}
