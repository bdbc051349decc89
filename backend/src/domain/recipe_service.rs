//! Recipe domain service.
//!
//! Writes run the pure draft pipeline, resolve ingredients against the
//! catalogue and only then hand a fully resolved [`RecipeWrite`] to the
//! repository, so a rejected draft never touches storage. Reads load base
//! rows and then one batch of decorations for the whole result set.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;

use crate::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, RecipeCommand, RecipeQuery, RecipeRepository,
    RecipeRepositoryError, RecipeWrite,
};
use crate::domain::{
    Error, RecipeDraft, RecipeId, RecipeRecord, RecipeSearch, RecipeValidationError, RecipeView,
    User, assemble_recipes, require_admin, require_admin_or_owner, resolve_ingredients,
};

/// Recipe service implementing the recipe driving ports.
#[derive(Clone)]
pub struct RecipeService<R, C> {
    recipes: Arc<R>,
    catalogue: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<R, C> RecipeService<R, C> {
    /// Create a new service with the given repositories.
    pub fn new(recipes: Arc<R>, catalogue: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            recipes,
            catalogue,
            clock,
        }
    }
}

pub(crate) fn map_recipe_error(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
    }
}

pub(crate) fn map_catalogue_error(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("catalogue repository unavailable: {message}"))
        }
        CatalogueRepositoryError::Query { message } => {
            Error::internal(format!("catalogue repository error: {message}"))
        }
        CatalogueRepositoryError::DuplicateName { name } => {
            Error::conflict(format!("{name} already exists"))
        }
    }
}

fn map_validation_error(error: RecipeValidationError) -> Error {
    let message = error.to_string();
    match error {
        RecipeValidationError::Duplicates(duplicates) => {
            Error::invalid_request(message).with_details(json!({
                "list": duplicates.kind().label(),
                "duplicates": duplicates.names(),
            }))
        }
        _ => Error::invalid_request(message),
    }
}

fn recipe_not_found() -> Error {
    Error::not_found("Recipe not found")
}

impl<R, C> RecipeService<R, C>
where
    R: RecipeRepository,
    C: CatalogueRepository,
{
    async fn prepare(&self, draft: RecipeDraft) -> Result<RecipeWrite, Error> {
        let plan = draft.normalize().map_err(map_validation_error)?;

        let names = plan.ingredient_names();
        let found = if names.is_empty() {
            Vec::new()
        } else {
            self.catalogue
                .find_ingredients_by_names(&names)
                .await
                .map_err(map_catalogue_error)?
        };
        let ingredients = resolve_ingredients(&plan, &found).map_err(|err| {
            Error::invalid_request(err.to_string())
                .with_details(json!({ "missingIngredients": err.names() }))
        })?;

        Ok(RecipeWrite {
            fields: plan.fields,
            ingredients,
            tag_names: plan.tag_names,
        })
    }

    async fn decorate(&self, records: Vec<RecipeRecord>) -> Result<Vec<RecipeView>, Error> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<RecipeId> = records.iter().map(|record| record.id).collect();
        let decorations = self
            .recipes
            .load_decorations(&ids)
            .await
            .map_err(map_recipe_error)?;
        Ok(assemble_recipes(records, decorations))
    }

    async fn load_view(&self, id: RecipeId) -> Result<RecipeView, Error> {
        let record = self
            .recipes
            .find_record(id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(recipe_not_found)?;
        self.decorate(vec![record])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::internal("decorated recipe went missing"))
    }

    async fn ensure_exists(&self, id: RecipeId) -> Result<(), Error> {
        if self.recipes.exists(id).await.map_err(map_recipe_error)? {
            Ok(())
        } else {
            Err(recipe_not_found())
        }
    }
}

#[async_trait]
impl<R, C> RecipeCommand for RecipeService<R, C>
where
    R: RecipeRepository,
    C: CatalogueRepository,
{
    async fn create(&self, actor: &User, draft: RecipeDraft) -> Result<RecipeView, Error> {
        require_admin(actor)?;
        let write = self.prepare(draft).await?;
        let id = self
            .recipes
            .create(actor.id, &write, self.clock.utc())
            .await
            .map_err(map_recipe_error)?;
        self.load_view(id).await
    }

    async fn update(
        &self,
        actor: &User,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        require_admin(actor)?;
        self.ensure_exists(id).await?;
        let write = self.prepare(draft).await?;
        let updated = self
            .recipes
            .update(id, &write)
            .await
            .map_err(map_recipe_error)?;
        if !updated {
            return Err(recipe_not_found());
        }
        self.load_view(id).await
    }

    async fn delete(&self, actor: &User, id: RecipeId) -> Result<RecipeView, Error> {
        self.ensure_exists(id).await?;
        let author = self.recipes.author_of(id).await.map_err(map_recipe_error)?;
        require_admin_or_owner(actor, author)?;

        let view = self.load_view(id).await?;
        let deleted = self.recipes.delete(id).await.map_err(map_recipe_error)?;
        if !deleted {
            return Err(recipe_not_found());
        }
        Ok(view)
    }
}

#[async_trait]
impl<R, C> RecipeQuery for RecipeService<R, C>
where
    R: RecipeRepository,
    C: CatalogueRepository,
{
    async fn list(&self, search: &RecipeSearch) -> Result<Vec<RecipeView>, Error> {
        let records = self
            .recipes
            .list_records(search)
            .await
            .map_err(map_recipe_error)?;
        self.decorate(records).await
    }

    async fn get(&self, id: RecipeId) -> Result<RecipeView, Error> {
        self.load_view(id).await
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
