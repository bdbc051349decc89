//! PostgreSQL-backed ingredient and tag catalogue.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::dsl::count;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{CatalogueRepository, CatalogueRepositoryError, IngredientDeletion};
use crate::domain::{CatalogueName, Ingredient, IngredientId, IngredientSummary, Tag, TagId};

use super::diesel_basic_error_mapping::{
    is_unique_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{IngredientRow, NewIngredientRow, NewTagRow, TagRow};
use super::pool::{DbPool, PoolError};
use super::schema::{ingredients, lower, recipe_ingredients, tags};

/// Diesel-backed implementation of the catalogue port.
#[derive(Clone)]
pub struct DieselCatalogueRepository {
    pool: DbPool,
}

impl DieselCatalogueRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogueRepositoryError {
    map_basic_pool_error(error, CatalogueRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogueRepositoryError {
    map_basic_diesel_error(
        error,
        CatalogueRepositoryError::query,
        CatalogueRepositoryError::connection,
    )
}

fn map_write_error(error: diesel::result::Error, name: &CatalogueName) -> CatalogueRepositoryError {
    if is_unique_violation(&error) {
        CatalogueRepositoryError::duplicate_name(name.as_ref())
    } else {
        map_diesel_error(error)
    }
}

fn row_to_ingredient(row: IngredientRow, recipe_count: i64) -> Ingredient {
    Ingredient {
        id: IngredientId::new(row.id),
        name: row.name,
        recipe_count,
    }
}

fn row_to_tag(row: TagRow) -> Tag {
    Tag {
        id: TagId::new(row.id),
        name: row.name,
    }
}

async fn usage_count(
    conn: &mut AsyncPgConnection,
    ingredient_id: i32,
) -> Result<i64, diesel::result::Error> {
    recipe_ingredients::table
        .filter(recipe_ingredients::ingredient_id.eq(ingredient_id))
        .count()
        .get_result::<i64>(conn)
        .await
}

#[async_trait]
impl CatalogueRepository for DieselCatalogueRepository {
    async fn list_ingredients(&self) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .order((lower(ingredients::name).asc(), ingredients::id.asc()))
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let counts: HashMap<i32, i64> = recipe_ingredients::table
            .group_by(recipe_ingredients::ingredient_id)
            .select((
                recipe_ingredients::ingredient_id,
                count(recipe_ingredients::recipe_id),
            ))
            .load::<(i32, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        Ok(rows
            .into_iter()
            .map(|row| {
                let used = counts.get(&row.id).copied().unwrap_or(0);
                row_to_ingredient(row, used)
            })
            .collect())
    }

    async fn find_ingredients_by_names(
        &self,
        names: &[String],
    ) -> Result<Vec<IngredientSummary>, CatalogueRepositoryError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(lower(ingredients::name).eq_any(names))
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows
            .into_iter()
            .map(|row| IngredientSummary {
                id: IngredientId::new(row.id),
                name: row.name,
            })
            .collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = ingredients::table
            .find(id.get())
            .select(IngredientRow::as_select())
            .first::<IngredientRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let used = usage_count(&mut conn, row.id)
            .await
            .map_err(map_diesel_error)?;
        Ok(Some(row_to_ingredient(row, used)))
    }

    async fn insert_ingredient(
        &self,
        name: &CatalogueName,
    ) -> Result<Ingredient, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(ingredients::table)
            .values(&NewIngredientRow {
                name: name.as_ref(),
            })
            .returning(IngredientRow::as_returning())
            .get_result::<IngredientRow>(&mut conn)
            .await
            .map_err(|err| map_write_error(err, name))?;
        Ok(row_to_ingredient(row, 0))
    }

    async fn rename_ingredient(
        &self,
        id: IngredientId,
        name: &CatalogueName,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::update(ingredients::table.find(id.get()))
            .set(&NewIngredientRow {
                name: name.as_ref(),
            })
            .returning(IngredientRow::as_returning())
            .get_result::<IngredientRow>(&mut conn)
            .await
            .optional()
            .map_err(|err| map_write_error(err, name))?;
        let Some(row) = row else {
            return Ok(None);
        };
        let used = usage_count(&mut conn, row.id)
            .await
            .map_err(map_diesel_error)?;
        Ok(Some(row_to_ingredient(row, used)))
    }

    async fn delete_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<IngredientDeletion, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let row = ingredients::table
                    .find(id.get())
                    .select(IngredientRow::as_select())
                    .first::<IngredientRow>(conn)
                    .await
                    .optional()?;
                let Some(row) = row else {
                    return Ok(IngredientDeletion::NotFound);
                };
                if usage_count(conn, row.id).await? > 0 {
                    return Ok(IngredientDeletion::InUse);
                }
                diesel::delete(ingredients::table.find(row.id))
                    .execute(conn)
                    .await?;
                Ok(IngredientDeletion::Deleted(row_to_ingredient(row, 0)))
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<TagRow> = tags::table
            .order((lower(tags::name).asc(), tags::id.asc()))
            .select(TagRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_tag).collect())
    }

    async fn insert_tag(&self, name: &CatalogueName) -> Result<Tag, CatalogueRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(tags::table)
            .values(&NewTagRow {
                name: name.as_ref(),
            })
            .returning(TagRow::as_returning())
            .get_result::<TagRow>(&mut conn)
            .await
            .map_err(|err| map_write_error(err, name))?;
        Ok(row_to_tag(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn unique_violations_become_duplicate_names() {
        let name = CatalogueName::ingredient("Salt").expect("valid name");
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key".to_owned()),
        );

        assert_eq!(
            map_write_error(error, &name),
            CatalogueRepositoryError::duplicate_name("salt")
        );
    }

    #[rstest]
    fn other_write_failures_are_query_errors() {
        let name = CatalogueName::tag("vegan").expect("valid name");
        let error = map_write_error(DieselError::NotFound, &name);
        assert!(matches!(error, CatalogueRepositoryError::Query { .. }));
    }
}
