//! Driving port for catalogue maintenance.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, IngredientId, Tag, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueCommand: Send + Sync {
    /// Add an ingredient. Administrators only.
    async fn create_ingredient(&self, actor: &User, name: &str) -> Result<Ingredient, Error>;

    /// Rename an ingredient. Administrators only.
    async fn rename_ingredient(
        &self,
        actor: &User,
        id: IngredientId,
        name: &str,
    ) -> Result<Ingredient, Error>;

    /// Remove an unused ingredient. Administrators only.
    async fn delete_ingredient(&self, actor: &User, id: IngredientId) -> Result<Ingredient, Error>;

    /// Add a tag explicitly. Any signed-in user.
    async fn create_tag(&self, actor: &User, name: &str) -> Result<Tag, Error>;
}

/// Fixture implementation that stores nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueCommand;

#[async_trait]
impl CatalogueCommand for FixtureCatalogueCommand {
    async fn create_ingredient(&self, _actor: &User, _name: &str) -> Result<Ingredient, Error> {
        Err(Error::service_unavailable("catalogue storage is not configured"))
    }

    async fn rename_ingredient(
        &self,
        _actor: &User,
        _id: IngredientId,
        _name: &str,
    ) -> Result<Ingredient, Error> {
        Err(Error::not_found("Ingredient not found"))
    }

    async fn delete_ingredient(
        &self,
        _actor: &User,
        _id: IngredientId,
    ) -> Result<Ingredient, Error> {
        Err(Error::not_found("Ingredient not found"))
    }

    async fn create_tag(&self, _actor: &User, _name: &str) -> Result<Tag, Error> {
        Err(Error::service_unavailable("catalogue storage is not configured"))
    }
}
