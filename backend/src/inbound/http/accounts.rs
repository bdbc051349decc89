//! Account API handlers.
//!
//! ```text
//! POST /api/v1/auth/register {"username":"ada","password":"s3cret"}
//! POST /api/v1/auth/login    {"username":"ada","password":"s3cret"}
//! GET  /api/v1/auth/me       Authorization: Bearer <token>
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::ports::AccountProfile;
use crate::domain::{Error, LoginCredentials, LoginValidationError, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_field};

/// Credentials body shared by registration and login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Public view of an account.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl From<User> for AccountResponse {
    fn from(user: User) -> Self {
        let profile = AccountProfile::from(user);
        Self {
            id: profile.id.get(),
            username: profile.username.into(),
            is_admin: profile.is_admin,
        }
    }
}

/// Issued bearer token and the account it belongs to.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    pub user: AccountResponse,
}

fn parse_credentials(payload: CredentialsRequest) -> Result<LoginCredentials, Error> {
    let username = require_field(payload.username, FieldName::new("username"))?;
    let password = require_field(payload.password, FieldName::new("password"))?;
    LoginCredentials::try_from_parts(&username, &password).map_err(map_login_validation_error)
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::Username(inner) => Error::invalid_request(inner.to_string())
            .with_details(json!({ "field": "username", "code": "invalid_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

/// Create an account. The very first account becomes the administrator.
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = AccountResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Username already exists", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = parse_credentials(payload.into_inner())?;
    let user = state.accounts.register(&credentials).await?;
    Ok(HttpResponse::Created().json(AccountResponse::from(user)))
}

/// Verify credentials and issue a bearer token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = parse_credentials(payload.into_inner())?;
    let session = state.accounts.login(&credentials).await?;
    Ok(web::Json(TokenResponse {
        access_token: session.token.as_str().to_owned(),
        token_type: "bearer".to_owned(),
        user: AccountResponse::from(session.user),
    }))
}

/// Return the account behind the presented bearer token.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Current account", body = AccountResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn me(user: CurrentUser) -> web::Json<AccountResponse> {
    web::Json(AccountResponse::from(user.into_inner()))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
