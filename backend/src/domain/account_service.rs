//! Account registration, login and bearer token resolution.
//!
//! The admin invariant (some account always holds the admin flag once any
//! account exists) is restored by [`ensure_admin_invariant`], which runs at
//! startup and after every registration.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    AccountService, AuthTokenRepository, AuthTokenRepositoryError, LoginSession, NewUser,
    UserPersistenceError, UserRepository,
};
use crate::domain::{AuthToken, Error, LoginCredentials, PasswordHash, User};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { .. } => {
            Error::conflict("Username already exists")
        }
    }
}

fn map_token_error(error: AuthTokenRepositoryError) -> Error {
    match error {
        AuthTokenRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("token repository unavailable: {message}"))
        }
        AuthTokenRepositoryError::Query { message } => {
            Error::internal(format!("token repository error: {message}"))
        }
    }
}

/// Promote the earliest account when no administrator exists.
///
/// Idempotent: returns `None` when an admin already exists or when there are
/// no accounts yet.
pub async fn ensure_admin_invariant<U>(users: &U) -> Result<Option<User>, Error>
where
    U: UserRepository + ?Sized,
{
    if users.has_admin().await.map_err(map_user_error)? {
        return Ok(None);
    }
    let promoted = users
        .promote_earliest_user()
        .await
        .map_err(map_user_error)?;
    if let Some(user) = &promoted {
        info!(user_id = %user.id, username = %user.username, "promoted earliest user to admin");
    }
    Ok(promoted)
}

/// Account service backed by user and token repositories.
#[derive(Clone)]
pub struct AccountServiceImpl<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    clock: Arc<dyn Clock>,
}

impl<U, T> AccountServiceImpl<U, T> {
    pub fn new(users: Arc<U>, tokens: Arc<T>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            tokens,
            clock,
        }
    }
}

fn invalid_login() -> Error {
    Error::unauthorized("Invalid username or password")
}

#[async_trait]
impl<U, T> AccountService for AccountServiceImpl<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        if self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
            .is_some()
        {
            return Err(Error::conflict("Username already exists"));
        }

        let created = self
            .users
            .insert(&NewUser {
                username: credentials.username().clone(),
                password_hash: PasswordHash::generate(credentials.password()),
                is_admin: false,
            })
            .await
            .map_err(map_user_error)?;

        match ensure_admin_invariant(self.users.as_ref()).await? {
            Some(promoted) if promoted.id == created.id => Ok(promoted),
            _ => Ok(created),
        }
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error> {
        let stored = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
            .ok_or_else(invalid_login)?;
        if !stored.password_hash.verify(credentials.password()) {
            return Err(invalid_login());
        }

        let token = AuthToken::generate();
        self.tokens
            .insert(&token, stored.user.id, self.clock.utc())
            .await
            .map_err(map_token_error)?;
        Ok(LoginSession {
            token,
            user: stored.user,
        })
    }

    async fn authenticate(&self, token: &AuthToken) -> Result<User, Error> {
        self.tokens
            .resolve(token, self.clock.utc())
            .await
            .map_err(map_token_error)?
            .ok_or_else(|| Error::unauthorized("Invalid token"))
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
