//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountService, CatalogueCommand, CatalogueQuery, EngagementCommand, EngagementQuery,
    FixtureAccountService, FixtureCatalogueCommand, FixtureCatalogueQuery,
    FixtureEngagementCommand, FixtureEngagementQuery, FixturePresenceCommand,
    FixturePresenceQuery, FixtureRecipeCommand, FixtureRecipeQuery, PresenceCommand,
    PresenceQuery, RecipeCommand, RecipeQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// [`HttpState::default`] wires every port to its fixture so tests only
/// replace the ports they exercise.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use recipe_backend::domain::ports::FixtureRecipeQuery;
/// use recipe_backend::inbound::http::state::HttpState;
///
/// let state = HttpState {
///     recipes_query: Arc::new(FixtureRecipeQuery),
///     ..HttpState::default()
/// };
/// let _accounts = state.accounts.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountService>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub catalogue: Arc<dyn CatalogueCommand>,
    pub catalogue_query: Arc<dyn CatalogueQuery>,
    pub engagement: Arc<dyn EngagementCommand>,
    pub engagement_query: Arc<dyn EngagementQuery>,
    pub presence: Arc<dyn PresenceCommand>,
    pub presence_query: Arc<dyn PresenceQuery>,
}

impl Default for HttpState {
    fn default() -> Self {
        Self {
            accounts: Arc::new(FixtureAccountService),
            recipes: Arc::new(FixtureRecipeCommand),
            recipes_query: Arc::new(FixtureRecipeQuery),
            catalogue: Arc::new(FixtureCatalogueCommand),
            catalogue_query: Arc::new(FixtureCatalogueQuery),
            engagement: Arc::new(FixtureEngagementCommand),
            engagement_query: Arc::new(FixtureEngagementQuery),
            presence: Arc::new(FixturePresenceCommand),
            presence_query: Arc::new(FixturePresenceQuery),
        }
    }
}
