//! Port for opaque bearer token storage.
//!
//! Tokens never expire and there is no revocation; logging out is a client
//! concern.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AuthToken, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum AuthTokenRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "token repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Persist a freshly issued token.
    async fn insert(
        &self,
        token: &AuthToken,
        user_id: UserId,
        issued_at: DateTime<Utc>,
    ) -> Result<(), AuthTokenRepositoryError>;

    /// Resolve a token to its owner, recording `seen_at` as last use.
    async fn resolve(
        &self,
        token: &AuthToken,
        seen_at: DateTime<Utc>,
    ) -> Result<Option<User>, AuthTokenRepositoryError>;
}
