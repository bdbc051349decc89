//! Test utilities for the backend crate.
//!
//! Compiled for the crate's own tests and, behind the `test-support`
//! feature, for the integration suites under `tests/`.

mod clock;
mod in_memory;

use std::sync::Arc;

use mockable::Clock;

use crate::domain::{
    AccountServiceImpl, CatalogueService, EngagementService, PresenceService, PresenceWindow,
    RecipeService,
};
use crate::inbound::http::state::HttpState;

pub use clock::ManualClock;
pub use in_memory::InMemoryStore;

/// HTTP state whose every port is served by the real domain services over
/// one shared [`InMemoryStore`].
pub fn in_memory_http_state(
    store: &InMemoryStore,
    clock: Arc<dyn Clock>,
    window: PresenceWindow,
) -> HttpState {
    let repo = Arc::new(store.clone());
    let recipes = Arc::new(RecipeService::new(repo.clone(), repo.clone(), clock.clone()));
    let catalogue = Arc::new(CatalogueService::new(repo.clone()));
    let engagement = Arc::new(EngagementService::new(repo.clone(), repo.clone(), clock.clone()));
    let presence = Arc::new(PresenceService::new(repo.clone(), clock.clone(), window));
    HttpState {
        accounts: Arc::new(AccountServiceImpl::new(repo.clone(), repo, clock)),
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
