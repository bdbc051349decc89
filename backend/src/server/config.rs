//! Server settings loaded via OrthoConfig and the derived runtime config.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use recipe_backend::domain::PresenceWindow;
use recipe_backend::outbound::persistence::DbPool;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_CORS_ORIGINS: [&str; 4] = [
    "http://localhost:5173",
    "http://127.0.0.1:5173",
    "http://localhost:3000",
    "http://127.0.0.1:3000",
];

/// Values read from `RECIPES_*` environment variables, config files or flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPES")]
pub struct ServerSettings {
    /// PostgreSQL connection string. Without it the server runs on fixtures.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Comma-separated browser origins allowed by CORS.
    pub cors_origins: Option<String>,
    /// Presence window in seconds; values under the floor are raised.
    pub presence_window_secs: Option<u64>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
}

impl ServerSettings {
    /// Parse the bind address, falling back to all interfaces on 8080.
    pub fn bind_addr(&self) -> std::io::Result<SocketAddr> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid bind address {raw:?}: {err}"),
            )
        })
    }

    /// Allowed CORS origins, trimmed, with blanks dropped.
    pub fn cors_origins(&self) -> Vec<String> {
        match self.cors_origins.as_deref() {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect(),
            None => DEFAULT_CORS_ORIGINS.iter().map(|o| (*o).to_owned()).collect(),
        }
    }

    pub fn presence_window(&self) -> PresenceWindow {
        self.presence_window_secs
            .map(PresenceWindow::from_secs)
            .unwrap_or_default()
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) presence_window: PresenceWindow,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            cors_origins: Vec::new(),
            presence_window: PresenceWindow::default(),
            db_pool: None,
        }
    }

    /// Derive the runtime configuration from loaded settings.
    pub fn from_settings(settings: &ServerSettings) -> std::io::Result<Self> {
        Ok(Self::new(settings.bind_addr()?)
            .with_cors_origins(settings.cors_origins())
            .with_presence_window(settings.presence_window()))
    }

    /// Attach a database pool. Without one every port uses its fixture.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    #[must_use]
    pub fn with_presence_window(mut self, window: PresenceWindow) -> Self {
        self.presence_window = window;
        self
    }

    #[cfg_attr(
        not(test),
        expect(dead_code, reason = "Read by the server bootstrap tests")
    )]
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
