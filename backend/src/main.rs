//! Backend entry-point: loads settings, prepares the database and serves the
//! REST API with OpenAPI docs.

mod server;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::domain::ensure_admin_invariant;
use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load()
        .map_err(|err| std::io::Error::other(format!("failed to load settings: {err}")))?;
    let mut config = ServerConfig::from_settings(&settings)?;

    match settings.database_url.as_deref() {
        Some(url) => {
            let pool = prepare_database(url, settings.db_max_connections).await?;
            config = config.with_db_pool(pool);
        }
        None => warn!("RECIPES_DATABASE_URL is unset; serving fixture data"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!("server started");
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome
}

/// Apply migrations, open the pool and reconcile the admin account.
async fn prepare_database(url: &str, max_connections: Option<u32>) -> std::io::Result<DbPool> {
    let applied = run_pending_migrations(url)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    info!(count = applied.len(), "migrations applied");

    let mut pool_config = PoolConfig::new(url);
    if let Some(max_size) = max_connections {
        pool_config = pool_config.with_max_size(max_size);
    }
    let pool = DbPool::new(pool_config)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;

    let users = DieselUserRepository::new(pool.clone());
    ensure_admin_invariant(&users)
        .await
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    Ok(pool)
}
