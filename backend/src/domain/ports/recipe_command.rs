//! Driving port for recipe writes.
//!
//! Creating and editing recipes is reserved for administrators; deletion is
//! open to administrators and the recipe's author.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDraft, RecipeId, RecipeView, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Validate, resolve and store a new recipe authored by `actor`.
    async fn create(&self, actor: &User, draft: RecipeDraft) -> Result<RecipeView, Error>;

    /// Replace a recipe's scalars and associations.
    async fn update(&self, actor: &User, id: RecipeId, draft: RecipeDraft)
    -> Result<RecipeView, Error>;

    /// Delete a recipe and return its last state.
    async fn delete(&self, actor: &User, id: RecipeId) -> Result<RecipeView, Error>;
}

/// Fixture implementation rejecting every write as not found.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeCommand;

#[async_trait]
impl RecipeCommand for FixtureRecipeCommand {
    async fn create(&self, _actor: &User, _draft: RecipeDraft) -> Result<RecipeView, Error> {
        Err(Error::service_unavailable("recipe storage is not configured"))
    }

    async fn update(
        &self,
        _actor: &User,
        _id: RecipeId,
        _draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        Err(Error::not_found("Recipe not found"))
    }

    async fn delete(&self, _actor: &User, _id: RecipeId) -> Result<RecipeView, Error> {
        Err(Error::not_found("Recipe not found"))
    }
}
