//! Real domain services over the Diesel adapters and an embedded PostgreSQL
//! database.
//!
//! Each context gets its own temporary database on the shared cluster, with
//! the embedded migrations applied through the production migration runner.
//! Suites stay synchronous and drive async calls through the context's
//! runtime so that `postgres::Client` row checks never run inside it.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use pg_embedded_setup_unpriv::{ClusterHandle, TemporaryDatabase};
use postgres::{Client, NoTls};
use recipe_backend::domain::{
    AccountServiceImpl, CatalogueService, EngagementService, PresenceService, PresenceWindow,
    RecipeService,
};
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselCatalogueRepository, DieselEngagementRepository,
    DieselPresenceRepository, DieselRecipeRepository, DieselUserRepository, PoolConfig,
    run_pending_migrations,
};
use recipe_backend::test_support::ManualClock;
use tokio::runtime::Runtime;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true" or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip when `SKIP_TEST_CLUSTER` is set, fail loudly otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// Render a `postgres` error with its SQLSTATE and detail.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };
    let mut summary = format!("postgres error {:?}: {}", db_error.code(), db_error.message());
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    summary
}

/// Pin `PG_PASSWORD` so a data directory reused by a later test binary still
/// accepts the password it was initialised with.
fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the cluster bootstrap spawns any threads, and the
        // shared handle initialises at most once per process.
        unsafe {
            std::env::set_var("PG_PASSWORD", "recipes_embedded_test");
        }
    }
}

fn shared_cluster() -> Result<&'static ClusterHandle, String> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) if attempt >= SHARED_CLUSTER_RETRIES => return Err(format!("{error:?}")),
            Err(_) => {
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

pub struct PostgresContext {
    runtime: Runtime,
    pub clock: ManualClock,
    pub state: HttpState,
    pub presence_repository: DieselPresenceRepository,
    pub users: DieselUserRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

impl PostgresContext {
    pub fn new() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let database = shared_cluster()?
            .create_temporary_database()
            .map_err(|err| format!("{err:?}"))?;
        let database_url = database.url().to_string();

        let pool = runtime.block_on(async {
            run_pending_migrations(&database_url)
                .await
                .map_err(|err| err.to_string())?;
            let config = PoolConfig::new(database_url.as_str())
                .with_max_size(2)
                .with_min_idle(Some(1));
            DbPool::new(config).await.map_err(|err| err.to_string())
        })?;

        let clock = ManualClock::fixed();
        let state = diesel_http_state(&pool, Arc::new(clock.clone()));
        Ok(Self {
            runtime,
            clock,
            state,
            presence_repository: DieselPresenceRepository::new(pool.clone()),
            users: DieselUserRepository::new(pool),
            database_url,
            _database: database,
        })
    }

    /// Drive one async step to completion on the context's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Run a scalar `COUNT(*)` query against the test database.
    pub fn count(&self, sql: &str) -> i64 {
        let mut client = Client::connect(&self.database_url, NoTls)
            .map_err(|err| format_postgres_error(&err))
            .expect("connect for row check");
        client
            .query_one(sql, &[])
            .map_err(|err| format_postgres_error(&err))
            .expect("row check query")
            .get(0)
    }

    /// Rows in `table` whose `column` equals `id`.
    pub fn rows_for(&self, table: &str, column: &str, id: i32) -> i64 {
        self.count(&format!(
            "SELECT COUNT(*) FROM {table} WHERE {column} = {id}"
        ))
    }
}

fn diesel_http_state(pool: &DbPool, clock: Arc<ManualClock>) -> HttpState {
    let users = Arc::new(DieselUserRepository::new(pool.clone()));
    let tokens = Arc::new(DieselAuthTokenRepository::new(pool.clone()));
    let recipes_repo = Arc::new(DieselRecipeRepository::new(pool.clone()));
    let catalogue_repo = Arc::new(DieselCatalogueRepository::new(pool.clone()));
    let engagement_repo = Arc::new(DieselEngagementRepository::new(pool.clone()));
    let presence_repo = Arc::new(DieselPresenceRepository::new(pool.clone()));

    let recipes = Arc::new(RecipeService::new(
        recipes_repo.clone(),
        catalogue_repo.clone(),
        clock.clone(),
    ));
    let catalogue = Arc::new(CatalogueService::new(catalogue_repo));
    let engagement = Arc::new(EngagementService::new(
        engagement_repo,
        recipes_repo,
        clock.clone(),
    ));
    let presence = Arc::new(PresenceService::new(
        presence_repo,
        clock.clone(),
        PresenceWindow::default(),
    ));
    HttpState {
        accounts: Arc::new(AccountServiceImpl::new(users, tokens, clock)),
        recipes: recipes.clone(),
        recipes_query: recipes,
        catalogue: catalogue.clone(),
        catalogue_query: catalogue,
        engagement: engagement.clone(),
        engagement_query: engagement,
        presence: presence.clone(),
        presence_query: presence,
    }
}
