//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`) are implemented by persistence adapters.
//! Driving ports (`*Command`, `*Query`, [`AccountService`]) are consumed by
//! inbound adapters and implemented by the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod account_service;
mod auth_token_repository;
mod catalogue_command;
mod catalogue_query;
mod catalogue_repository;
mod engagement_command;
mod engagement_query;
mod engagement_repository;
mod presence_command;
mod presence_query;
mod presence_repository;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod user_repository;


#[cfg(test)]
pub use account_service::MockAccountService;
pub use account_service::{AccountProfile, AccountService, FixtureAccountService, LoginSession};
#[cfg(test)]
pub use auth_token_repository::MockAuthTokenRepository;
pub use auth_token_repository::{AuthTokenRepository, AuthTokenRepositoryError};
#[cfg(test)]
pub use catalogue_command::MockCatalogueCommand;
pub use catalogue_command::{CatalogueCommand, FixtureCatalogueCommand};
#[cfg(test)]
pub use catalogue_query::MockCatalogueQuery;
pub use catalogue_query::{CatalogueQuery, FixtureCatalogueQuery};
#[cfg(test)]
pub use catalogue_repository::MockCatalogueRepository;
pub use catalogue_repository::{
    CatalogueRepository, CatalogueRepositoryError, FixtureCatalogueRepository, IngredientDeletion,
};
#[cfg(test)]
pub use engagement_command::MockEngagementCommand;
pub use engagement_command::{EngagementCommand, FixtureEngagementCommand};
#[cfg(test)]
pub use engagement_query::MockEngagementQuery;
pub use engagement_query::{EngagementQuery, FixtureEngagementQuery};
#[cfg(test)]
pub use engagement_repository::MockEngagementRepository;
pub use engagement_repository::{EngagementRepository, EngagementRepositoryError};
#[cfg(test)]
pub use presence_command::MockPresenceCommand;
pub use presence_command::{FixturePresenceCommand, PresenceCommand};
#[cfg(test)]
pub use presence_query::MockPresenceQuery;
pub use presence_query::{FixturePresenceQuery, PresenceQuery};
#[cfg(test)]
pub use presence_repository::MockPresenceRepository;
pub use presence_repository::{PresenceRepository, PresenceRepositoryError};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::{FixtureRecipeCommand, RecipeCommand};
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::{FixtureRecipeQuery, RecipeQuery};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{
    FixtureRecipeRepository, RecipeRepository, RecipeRepositoryError, RecipeWrite,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, StoredUser, UserPersistenceError, UserRepository};
