//! Driving port for catalogue listings.

use async_trait::async_trait;

use crate::domain::{Error, Ingredient, Tag};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogueQuery: Send + Sync {
    /// Ingredients ordered by name with recipe counts.
    async fn ingredients(&self) -> Result<Vec<Ingredient>, Error>;

    async fn tags(&self) -> Result<Vec<Tag>, Error>;
}

/// Fixture implementation with an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCatalogueQuery;

#[async_trait]
impl CatalogueQuery for FixtureCatalogueQuery {
    async fn ingredients(&self) -> Result<Vec<Ingredient>, Error> {
        Ok(Vec::new())
    }

    async fn tags(&self) -> Result<Vec<Tag>, Error> {
        Ok(Vec::new())
    }
}
