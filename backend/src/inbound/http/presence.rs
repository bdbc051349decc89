//! Presence HTTP handlers.
//!
//! ```text
//! POST /api/v1/presence/heartbeat {"deviceId":"tab-1"}
//! POST /api/v1/presence/offline   {"deviceId":"tab-1"}
//! GET  /api/v1/presence/online
//! ```
//!
//! Heartbeats are accepted from anonymous clients. When an `Authorization`
//! header is present it must be valid; the resolved user and the
//! `User-Agent` header are recorded with the device.

use actix_web::http::header::USER_AGENT;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{DeviceId, Error, Heartbeat, OnlineCount};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::MaybeUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, invalid_value_error, require_field};

/// Device identification sent with heartbeat and offline signals.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceRequest {
    #[schema(example = "5f0c2b9e-tab-1")]
    pub device_id: Option<String>,
}

impl DeviceRequest {
    fn into_device_id(self) -> Result<DeviceId, Error> {
        let field = FieldName::new("deviceId");
        let raw = require_field(self.device_id, field)?;
        DeviceId::new(&raw).map_err(|err| invalid_value_error(field, err.to_string(), &raw))
    }
}

/// Approximate number of distinct online users and devices.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OnlineCountResponse {
    pub online: usize,
    pub window_seconds: u64,
}

impl From<OnlineCount> for OnlineCountResponse {
    fn from(value: OnlineCount) -> Self {
        Self {
            online: value.online,
            window_seconds: value.window_seconds,
        }
    }
}

/// Record that a device is active.
#[utoipa::path(
    post,
    path = "/api/v1/presence/heartbeat",
    request_body = DeviceRequest,
    responses(
        (status = 204, description = "Heartbeat recorded"),
        (status = 400, description = "Missing device id", body = ErrorSchema),
        (status = 401, description = "Invalid token", body = ErrorSchema)
    ),
    tags = ["presence"],
    operation_id = "presenceHeartbeat",
    security((), ("BearerToken" = []))
)]
#[post("/presence/heartbeat")]
pub async fn heartbeat(
    state: web::Data<HttpState>,
    req: HttpRequest,
    user: MaybeUser,
    payload: web::Json<DeviceRequest>,
) -> ApiResult<HttpResponse> {
    let device_id = payload.into_inner().into_device_id()?;
    let user_agent = req
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok());
    let heartbeat = Heartbeat::new(device_id, user.0.map(|user| user.id), user_agent);
    state.presence.heartbeat(heartbeat).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Forget a device immediately.
#[utoipa::path(
    post,
    path = "/api/v1/presence/offline",
    request_body = DeviceRequest,
    responses(
        (status = 204, description = "Device forgotten"),
        (status = 400, description = "Missing device id", body = ErrorSchema)
    ),
    tags = ["presence"],
    operation_id = "presenceOffline",
    security([])
)]
#[post("/presence/offline")]
pub async fn offline(
    state: web::Data<HttpState>,
    payload: web::Json<DeviceRequest>,
) -> ApiResult<HttpResponse> {
    let device_id = payload.into_inner().into_device_id()?;
    state.presence.offline(&device_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Count distinct entities seen inside the presence window.
#[utoipa::path(
    get,
    path = "/api/v1/presence/online",
    responses(
        (status = 200, description = "Online count", body = OnlineCountResponse),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["presence"],
    operation_id = "presenceOnline",
    security([])
)]
#[get("/presence/online")]
pub async fn online(state: web::Data<HttpState>) -> ApiResult<web::Json<OnlineCountResponse>> {
    let count = state.presence_query.online_count().await?;
    Ok(web::Json(count.into()))
}
