//! Builders wiring domain services onto the HTTP state.

use std::sync::Arc;

use mockable::DefaultClock;

use recipe_backend::domain::{
    AccountServiceImpl, CatalogueService, EngagementService, PresenceService, RecipeService,
};
use recipe_backend::inbound::http::state::HttpState;
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselCatalogueRepository, DieselEngagementRepository,
    DieselPresenceRepository, DieselRecipeRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Build the HTTP state from configuration.
///
/// With a pool every port is served by its domain service over Diesel
/// repositories; without one the fixtures in [`HttpState::default`] answer.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    match &config.db_pool {
        Some(pool) => build_persistent_state(pool, config),
        None => HttpState::default(),
    }
}

fn build_persistent_state(pool: &DbPool, config: &ServerConfig) -> HttpState {
    let clock = Arc::new(DefaultClock);
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
        config.presence_window,
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

#[cfg(test)]
mod tests {
    use super::*;
    use recipe_backend::domain::DeviceId;
    use recipe_backend::domain::Heartbeat;

    #[actix_rt::test]
    async fn fixtures_answer_without_a_pool() {
        let config = ServerConfig::new("127.0.0.1:0".parse().expect("socket address"));
        let state = build_http_state(&config);

        let count = state
            .presence_query
            .online_count()
            .await
            .expect("fixture count");
        assert_eq!(count.online, 0);
        assert_eq!(count.window_seconds, 120);

        let device = DeviceId::new("tab").expect("device id");
        state
            .presence
            .heartbeat(Heartbeat::new(device, None, None))
            .await
            .expect("fixture heartbeat");
    }
}
