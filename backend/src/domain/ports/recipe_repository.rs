//! Port for recipe aggregate persistence.
//!
//! Adapters own transactional boundaries: [`RecipeRepository::create`] and
//! [`RecipeRepository::update`] write scalars, ingredient links, tag links
//! and quantities as one unit, creating absent tags on the way. Reads are
//! split into base rows and one batched decoration load so listings never
//! issue a query per recipe.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    RecipeDecorations, RecipeFields, RecipeId, RecipeRecord, RecipeSearch, ResolvedIngredient,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "recipe repository query failed: {message}",
    }
}

/// Fully resolved recipe write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeWrite {
    pub fields: RecipeFields,
    /// Ingredient links with their per-recipe quantity.
    pub ingredients: Vec<ResolvedIngredient>,
    /// Normalised tag names; absent tags are created.
    pub tag_names: Vec<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe with its associations and author link.
    async fn create(
        &self,
        author: UserId,
        write: &RecipeWrite,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipeRepositoryError>;

    /// Replace scalars and associations. Returns `false` when the recipe
    /// does not exist. The author link is never changed.
    async fn update(&self, id: RecipeId, write: &RecipeWrite)
    -> Result<bool, RecipeRepositoryError>;

    /// Remove a recipe and everything it owns, following
    /// [`crate::domain::RECIPE_DELETION_PLAN`]. Returns `false` when absent.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    /// Whether a recipe row exists.
    async fn exists(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    /// Base rows matching a search, newest first.
    async fn list_records(
        &self,
        search: &RecipeSearch,
    ) -> Result<Vec<RecipeRecord>, RecipeRepositoryError>;

    /// Base row for a single recipe.
    async fn find_record(&self, id: RecipeId)
    -> Result<Option<RecipeRecord>, RecipeRepositoryError>;

    /// Batch-load every decoration for the given recipes.
    async fn load_decorations(
        &self,
        ids: &[RecipeId],
    ) -> Result<RecipeDecorations, RecipeRepositoryError>;

    /// Recorded author of a recipe.
    async fn author_of(&self, id: RecipeId) -> Result<Option<UserId>, RecipeRepositoryError>;
}

/// Fixture implementation holding no recipes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureRecipeRepository;

#[async_trait]
impl RecipeRepository for FixtureRecipeRepository {
    async fn create(
        &self,
        _author: UserId,
        _write: &RecipeWrite,
        _created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        Ok(RecipeId::new(1))
    }

    async fn update(
        &self,
        _id: RecipeId,
        _write: &RecipeWrite,
    ) -> Result<bool, RecipeRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        Ok(false)
    }

    async fn exists(&self, _id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        Ok(false)
    }

    async fn list_records(
        &self,
        _search: &RecipeSearch,
    ) -> Result<Vec<RecipeRecord>, RecipeRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_record(
        &self,
        _id: RecipeId,
    ) -> Result<Option<RecipeRecord>, RecipeRepositoryError> {
        Ok(None)
    }

    async fn load_decorations(
        &self,
        _ids: &[RecipeId],
    ) -> Result<RecipeDecorations, RecipeRepositoryError> {
        Ok(RecipeDecorations::default())
    }

    async fn author_of(&self, _id: RecipeId) -> Result<Option<UserId>, RecipeRepositoryError> {
        Ok(None)
    }
}
