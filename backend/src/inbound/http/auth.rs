//! Bearer token extractors used by HTTP handlers.
//!
//! Handlers take [`CurrentUser`] when a signed-in caller is required and
//! [`MaybeUser`] when anonymous callers are allowed. Both resolve the token
//! through [`crate::domain::ports::AccountService::authenticate`], so the
//! token store never leaks into handler code.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AuthToken, Error, User};
use crate::inbound::http::state::HttpState;

const BEARER_SCHEME: &str = "bearer";

/// Authenticated caller. Extraction fails with `401` when the header is
/// missing, malformed or names an unknown token.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn into_inner(self) -> User {
        self.0
    }
}

/// Optionally authenticated caller. A missing header yields `None`; a
/// present but unusable token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<User>);

/// Pull the bearer token out of the `Authorization` header.
///
/// The scheme is matched case-insensitively.
pub(crate) fn bearer_token(req: &HttpRequest) -> Result<Option<AuthToken>, Error> {
    let Some(raw) = req.headers().get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = raw
        .to_str()
        .map_err(|_| Error::unauthorized("Invalid authorization header"))?;
    let (scheme, credentials) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| Error::unauthorized("Invalid authorization header"))?;
    if !scheme.eq_ignore_ascii_case(BEARER_SCHEME) {
        return Err(Error::unauthorized("Unsupported authorization scheme"));
    }
    AuthToken::parse(credentials)
        .map(Some)
        .ok_or_else(|| Error::unauthorized("Invalid authorization header"))
}

fn http_state(req: &HttpRequest) -> Result<web::Data<HttpState>, Error> {
    req.app_data::<web::Data<HttpState>>()
        .cloned()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))
}

async fn resolve(
    state: Result<web::Data<HttpState>, Error>,
    token: AuthToken,
) -> Result<User, Error> {
    state?.accounts.authenticate(&token).await
}

impl FromRequest for CurrentUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = http_state(req);
        Box::pin(async move {
            let token = token?.ok_or_else(|| Error::unauthorized("Not authenticated"))?;
            resolve(state, token).await.map(CurrentUser)
        })
    }
}

impl FromRequest for MaybeUser {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = bearer_token(req);
        let state = http_state(req);
        Box::pin(async move {
            match token? {
                Some(token) => resolve(state, token).await.map(|user| MaybeUser(Some(user))),
                None => Ok(MaybeUser(None)),
            }
        })
    }
}
