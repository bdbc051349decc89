//! Ingredient and tag catalogue service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    CatalogueCommand, CatalogueQuery, CatalogueRepository, CatalogueRepositoryError,
    IngredientDeletion,
};
use crate::domain::recipe_service::map_catalogue_error;
use crate::domain::{CatalogueName, Error, Ingredient, IngredientId, Tag, User, require_admin};

/// Catalogue service implementing the catalogue driving ports.
#[derive(Clone)]
pub struct CatalogueService<C> {
    catalogue: Arc<C>,
}

impl<C> CatalogueService<C> {
    pub fn new(catalogue: Arc<C>) -> Self {
        Self { catalogue }
    }
}

fn ingredient_not_found() -> Error {
    Error::not_found("Ingredient not found")
}

fn ingredient_conflict(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::DuplicateName { .. } => {
            Error::conflict("Ingredient already exists")
        }
        other => map_catalogue_error(other),
    }
}

fn tag_conflict(error: CatalogueRepositoryError) -> Error {
    match error {
        CatalogueRepositoryError::DuplicateName { .. } => Error::conflict("Tag already exists"),
        other => map_catalogue_error(other),
    }
}

#[async_trait]
impl<C> CatalogueCommand for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn create_ingredient(&self, actor: &User, name: &str) -> Result<Ingredient, Error> {
        require_admin(actor)?;
        let name = CatalogueName::ingredient(name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.catalogue
            .insert_ingredient(&name)
            .await
            .map_err(ingredient_conflict)
    }

    async fn rename_ingredient(
        &self,
        actor: &User,
        id: IngredientId,
        name: &str,
    ) -> Result<Ingredient, Error> {
        require_admin(actor)?;
        let name = CatalogueName::ingredient(name)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        self.catalogue
            .rename_ingredient(id, &name)
            .await
            .map_err(ingredient_conflict)?
            .ok_or_else(ingredient_not_found)
    }

    async fn delete_ingredient(&self, actor: &User, id: IngredientId) -> Result<Ingredient, Error> {
        require_admin(actor)?;
        match self
            .catalogue
            .delete_ingredient(id)
            .await
            .map_err(map_catalogue_error)?
        {
            IngredientDeletion::Deleted(ingredient) => Ok(ingredient),
            IngredientDeletion::InUse => Err(Error::conflict(
                "Cannot delete ingredient that is used by recipes",
            )),
            IngredientDeletion::NotFound => Err(ingredient_not_found()),
        }
    }

    async fn create_tag(&self, _actor: &User, name: &str) -> Result<Tag, Error> {
        let name =
            CatalogueName::tag(name).map_err(|err| Error::invalid_request(err.to_string()))?;
        self.catalogue.insert_tag(&name).await.map_err(tag_conflict)
    }
}

#[async_trait]
impl<C> CatalogueQuery for CatalogueService<C>
where
    C: CatalogueRepository,
{
    async fn ingredients(&self) -> Result<Vec<Ingredient>, Error> {
        self.catalogue
            .list_ingredients()
            .await
            .map_err(map_catalogue_error)
    }

    async fn tags(&self) -> Result<Vec<Tag>, Error> {
        self.catalogue.list_tags().await.map_err(map_catalogue_error)
    }
}
