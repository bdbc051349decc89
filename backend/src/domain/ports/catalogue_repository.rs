//! Port for the ingredient and tag catalogue.

use async_trait::async_trait;

use crate::domain::{CatalogueName, Ingredient, IngredientId, IngredientSummary, Tag};

use super::define_port_error;

define_port_error! {
    /// Errors raised by catalogue repository adapters.
    pub enum CatalogueRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalogue repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "catalogue repository query failed: {message}",
        /// A row with the same case-insensitive name already exists.
        DuplicateName { name: String } => "catalogue name already exists: {name}",
    }
}

/// Outcome of an ingredient deletion attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngredientDeletion {
    /// The row was removed.
    Deleted(Ingredient),
    /// At least one recipe still references the ingredient.
    InUse,
    NotFound,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueRepository: Send + Sync {
    /// Every ingredient ordered by name, with usage counts.
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, CatalogueRepositoryError>;

    /// Ingredients whose lower-cased name is in `names`. Unmatched names
    /// are simply absent from the result.
    async fn find_ingredients_by_names(
        &self,
        names: &[String],
    ) -> Result<Vec<IngredientSummary>, CatalogueRepositoryError>;

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;

    async fn insert_ingredient(
        &self,
        name: &CatalogueName,
    ) -> Result<Ingredient, CatalogueRepositoryError>;

    /// Rename an ingredient. Returns `None` when it does not exist.
    async fn rename_ingredient(
        &self,
        id: IngredientId,
        name: &CatalogueName,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError>;

    /// Delete an ingredient unless a recipe still uses it.
    async fn delete_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<IngredientDeletion, CatalogueRepositoryError>;

    /// Every tag ordered by name.
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError>;

    async fn insert_tag(&self, name: &CatalogueName) -> Result<Tag, CatalogueRepositoryError>;
}

/// Fixture implementation with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueRepository;

#[async_trait]
impl CatalogueRepository for FixtureCatalogueRepository {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_ingredients_by_names(
        &self,
        _names: &[String],
    ) -> Result<Vec<IngredientSummary>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_ingredient(
        &self,
        _id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn insert_ingredient(
        &self,
        name: &CatalogueName,
    ) -> Result<Ingredient, CatalogueRepositoryError> {
        Ok(Ingredient {
            id: IngredientId::new(1),
            name: name.to_string(),
            recipe_count: 0,
        })
    }

    async fn rename_ingredient(
        &self,
        _id: IngredientId,
        _name: &CatalogueName,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(None)
    }

    async fn delete_ingredient(
        &self,
        _id: IngredientId,
    ) -> Result<IngredientDeletion, CatalogueRepositoryError> {
        Ok(IngredientDeletion::NotFound)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        Ok(Vec::new())
    }

    async fn insert_tag(&self, name: &CatalogueName) -> Result<Tag, CatalogueRepositoryError> {
        Ok(Tag {
            id: crate::domain::TagId::new(1),
            name: name.to_string(),
        })
    }
}
