//! Approximate "who is online" tracking.
//!
//! Clients send periodic heartbeats keyed by a client-generated device id.
//! Counting collapses recent records into distinct entities using a layered
//! key: `(user, agent)` when both are known, else `(user, device)`, else the
//! device alone. Results are best effort; racing heartbeats are not
//! coordinated.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::UserId;

/// Default trailing window for counting a device as online.
pub const DEFAULT_PRESENCE_WINDOW_SECS: u64 = 120;
/// Smallest window accepted from configuration.
pub const MIN_PRESENCE_WINDOW_SECS: u64 = 30;

/// Longest window accepted; larger configured values are lowered to it.
pub const MAX_PRESENCE_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Validation errors for heartbeat payloads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceValidationError {
    EmptyDeviceId,
}

impl fmt::Display for PresenceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDeviceId => f.write_str("device_id is required"),
        }
    }
}

impl std::error::Error for PresenceValidationError {}

/// Trimmed client-generated device identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceId(String);

impl DeviceId {
    pub fn new(raw: &str) -> Result<Self, PresenceValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PresenceValidationError::EmptyDeviceId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DeviceId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DeviceId> for String {
    fn from(value: DeviceId) -> Self {
        value.0
    }
}

impl TryFrom<String> for DeviceId {
    type Error = PresenceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

/// Trailing interval within which a heartbeat counts as online.
///
/// # Examples
/// ```
/// use recipe_backend::domain::PresenceWindow;
///
/// assert_eq!(PresenceWindow::default().as_secs(), 120);
/// assert_eq!(PresenceWindow::from_secs(5).as_secs(), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceWindow(Duration);

impl PresenceWindow {
    /// Build a window, clamping it between the floor and the ceiling.
    pub fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(
            secs.clamp(MIN_PRESENCE_WINDOW_SECS, MAX_PRESENCE_WINDOW_SECS),
        ))
    }

    pub fn as_secs(self) -> u64 {
        self.0.as_secs()
    }

    /// Oldest `last_seen_at` still inside the window.
    ///
    /// Saturates at the earliest representable instant instead of
    /// overflowing.
    pub fn threshold(self, now: DateTime<Utc>) -> DateTime<Utc> {
        i64::try_from(self.as_secs())
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .and_then(|window| now.checked_sub_signed(window))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

impl Default for PresenceWindow {
    fn default() -> Self {
        Self::from_secs(DEFAULT_PRESENCE_WINDOW_SECS)
    }
}

/// One heartbeat from a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heartbeat {
    pub device_id: DeviceId,
    pub user_id: Option<UserId>,
    pub user_agent: Option<String>,
}

impl Heartbeat {
    /// Build a heartbeat; blank agents are treated as absent.
    pub fn new(device_id: DeviceId, user_id: Option<UserId>, user_agent: Option<&str>) -> Self {
        let user_agent = user_agent
            .map(str::trim)
            .filter(|agent| !agent.is_empty())
            .map(str::to_owned);
        Self {
            device_id,
            user_id,
            user_agent,
        }
    }

    /// Merge into the stored record for the same device. Present values
    /// overwrite; absent ones keep what was stored.
    pub fn apply_to(&self, existing: Option<&PresenceRecord>, now: DateTime<Utc>) -> PresenceRecord {
        PresenceRecord {
            device_id: self.device_id.clone(),
            user_id: self.user_id.or_else(|| existing.and_then(|r| r.user_id)),
            user_agent: self
                .user_agent
                .clone()
                .or_else(|| existing.and_then(|r| r.user_agent.clone())),
            last_seen_at: now,
        }
    }
}

/// Stored presence row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceRecord {
    pub device_id: DeviceId,
    pub user_id: Option<UserId>,
    pub user_agent: Option<String>,
    pub last_seen_at: DateTime<Utc>,
}

/// Identity used to collapse presence rows.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PresenceKey {
    UserAgent(UserId, String),
    UserDevice(UserId, DeviceId),
    Anonymous(DeviceId),
}

impl PresenceRecord {
    pub fn key(&self) -> PresenceKey {
        let agent = self
            .user_agent
            .as_deref()
            .map(|agent| agent.trim().to_lowercase())
            .filter(|agent| !agent.is_empty());
        match (self.user_id, agent) {
            (Some(user), Some(agent)) => PresenceKey::UserAgent(user, agent),
            (Some(user), None) => PresenceKey::UserDevice(user, self.device_id.clone()),
            (None, _) => PresenceKey::Anonymous(self.device_id.clone()),
        }
    }
}

/// Count distinct online entities among already window-filtered records.
pub fn count_online(records: &[PresenceRecord]) -> usize {
    records
        .iter()
        .map(PresenceRecord::key)
        .collect::<HashSet<_>>()
        .len()
}

/// Response for the online counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OnlineCount {
    pub online: usize,
    pub window_seconds: u64,
}
