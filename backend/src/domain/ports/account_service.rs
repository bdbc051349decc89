//! Driving port for registration, login and bearer token resolution.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters call it to
//! authenticate credentials without knowing (or importing) the backing
//! infrastructure. This makes HTTP handler tests deterministic because they
//! can substitute a test double instead of wiring persistence.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{AuthToken, Error, LoginCredentials, User, UserId, Username};

/// Token issued by a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    pub token: AuthToken,
    pub user: User,
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountProfile {
    pub id: UserId,
    pub username: Username,
    pub is_admin: bool,
}

impl From<User> for AccountProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_admin: user.is_admin,
        }
    }
}

/// Domain use-case port for accounts and authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Create an account. The first account ever registered becomes admin.
    async fn register(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Verify credentials and issue a new bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error>;

    /// Resolve a bearer token to its user.
    async fn authenticate(&self, token: &AuthToken) -> Result<User, Error>;
}

/// In-memory authenticator for handler tests.
///
/// `admin` / `password` logs in as an administrator and the fixed token
/// [`FixtureAccountService::TOKEN`] resolves to the same account.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAccountService;

impl FixtureAccountService {
    pub const TOKEN: &'static str = "fixture-token";

    fn admin() -> Result<User, Error> {
        let username = Username::new("admin")
            .map_err(|err| Error::internal(format!("invalid fixture username: {err}")))?;
        Ok(User {
            id: UserId::new(1),
            username,
            is_admin: true,
        })
    }
}

#[async_trait]
impl AccountService for FixtureAccountService {
    async fn register(&self, _credentials: &LoginCredentials) -> Result<User, Error> {
        Err(Error::conflict("Username already exists"))
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error> {
        if credentials.username().as_ref() == "admin" && credentials.password() == "password" {
            let token = AuthToken::parse(Self::TOKEN)
                .ok_or_else(|| Error::internal("invalid fixture token"))?;
            Ok(LoginSession {
                token,
                user: Self::admin()?,
            })
        } else {
            Err(Error::unauthorized("Invalid username or password"))
        }
    }

    async fn authenticate(&self, token: &AuthToken) -> Result<User, Error> {
        if token.as_str() == Self::TOKEN {
            Self::admin()
        } else {
            Err(Error::unauthorized("Invalid token"))
        }
    }
}
