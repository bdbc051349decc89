//! Driving port for recipe reads.

use async_trait::async_trait;

use crate::domain::{Error, RecipeId, RecipeSearch, RecipeView};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// Fully decorated recipes matching `search`.
    async fn list(&self, search: &RecipeSearch) -> Result<Vec<RecipeView>, Error>;

    async fn get(&self, id: RecipeId) -> Result<RecipeView, Error>;
}

/// Fixture implementation with no recipes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeQuery;

#[async_trait]
impl RecipeQuery for FixtureRecipeQuery {
    async fn list(&self, _search: &RecipeSearch) -> Result<Vec<RecipeView>, Error> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: RecipeId) -> Result<RecipeView, Error> {
        Err(Error::not_found("Recipe not found"))
    }
}
