//! PostgreSQL-backed `RecipeRepository` implementation.
//!
//! Writes run in one transaction covering scalars, author link, ingredient
//! links with quantities, and tag links (creating missing tags). Reads load
//! base rows first and then each decoration with a single query keyed by the
//! whole id set.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Nullable};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError, RecipeWrite};
use crate::domain::{
    CommentRecord, IngredientId, IngredientMeasurement, RECIPE_DELETION_PLAN, RecipeDecorations,
    RecipeDeletionStep, RecipeFields, RecipeId, RecipeRecord, RecipeSearch, SearchScope, Tag,
    TagId, UserId, missing_tag_names,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_engagement_repository::{load_comment_decorations, row_to_comment};
use super::models::{
    CommentRow, NewRecipeRow, NewTagRow, RecipeAuthorRow, RecipeIngredientRow, RecipeRow,
    RecipeTagRow, RecipeUpdate, TagRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{
    comment_authors, comment_likes, ingredients, lower, recipe_authors, recipe_comments,
    recipe_favorites, recipe_ingredients, recipe_tags, recipes, tags, users,
};

/// Diesel-backed implementation of the recipe repository port.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    map_basic_pool_error(error, RecipeRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> RecipeRepositoryError {
    map_basic_diesel_error(
        error,
        RecipeRepositoryError::query,
        RecipeRepositoryError::connection,
    )
}

fn row_to_record(row: RecipeRow) -> RecipeRecord {
    RecipeRecord {
        id: RecipeId::new(row.id),
        fields: RecipeFields {
            title: row.title,
            description: row.description,
            instructions: row.instructions,
            prep_time: row.prep_time,
            cook_time: row.cook_time,
        },
        created_at: row.created_at,
    }
}

fn raw_ids(ids: &[RecipeId]) -> Vec<i32> {
    ids.iter().map(|id| id.get()).collect()
}

// ---------------------------------------------------------------------------
// Search predicates
// ---------------------------------------------------------------------------

type RecipePredicate = Box<dyn BoxableExpression<recipes::table, Pg, SqlType = Nullable<Bool>>>;

/// `ILIKE` pattern matching `term` anywhere, with wildcards escaped.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

fn name_matches(pattern: &str) -> RecipePredicate {
    Box::new(
        recipes::title
            .ilike(pattern.to_owned())
            .nullable()
            .or(recipes::description.ilike(pattern.to_owned())),
    )
}

fn ingredient_matches(pattern: &str) -> RecipePredicate {
    Box::new(
        recipes::id
            .eq_any(
                recipe_ingredients::table
                    .inner_join(ingredients::table)
                    .filter(ingredients::name.ilike(pattern.to_owned()))
                    .select(recipe_ingredients::recipe_id),
            )
            .nullable(),
    )
}

fn tag_matches(pattern: &str) -> RecipePredicate {
    Box::new(
        recipes::id
            .eq_any(
                recipe_tags::table
                    .inner_join(tags::table)
                    .filter(tags::name.ilike(pattern.to_owned()))
                    .select(recipe_tags::recipe_id),
            )
            .nullable(),
    )
}

fn term_predicate(term: &str, scope: SearchScope) -> RecipePredicate {
    let pattern = contains_pattern(term);
    match scope {
        SearchScope::Name => name_matches(&pattern),
        SearchScope::Ingredients => ingredient_matches(&pattern),
        SearchScope::Tags => tag_matches(&pattern),
        SearchScope::All => Box::new(
            name_matches(&pattern)
                .or(ingredient_matches(&pattern))
                .or(tag_matches(&pattern)),
        ),
    }
}

// ---------------------------------------------------------------------------
// Write helpers
// ---------------------------------------------------------------------------

/// Resolve tag names to ids, inserting the ones that do not exist yet.
async fn ensure_tags(
    conn: &mut AsyncPgConnection,
    names: &[String],
) -> Result<Vec<i32>, diesel::result::Error> {
    if names.is_empty() {
        return Ok(Vec::new());
    }
    let existing: Vec<Tag> = tags::table
        .filter(lower(tags::name).eq_any(names))
        .select(TagRow::as_select())
        .load::<TagRow>(conn)
        .await?
        .into_iter()
        .map(|row| Tag {
            id: TagId::new(row.id),
            name: row.name,
        })
        .collect();

    let missing = missing_tag_names(names, &existing);
    let created: Vec<TagRow> = if missing.is_empty() {
        Vec::new()
    } else {
        let rows: Vec<NewTagRow<'_>> = missing
            .iter()
            .map(|name| NewTagRow { name: name.as_str() })
            .collect();
        diesel::insert_into(tags::table)
            .values(&rows)
            .returning(TagRow::as_returning())
            .get_results(conn)
            .await?
    };

    Ok(existing
        .iter()
        .map(|tag| tag.id.get())
        .chain(created.iter().map(|row| row.id))
        .collect())
}

/// Insert ingredient and tag links for a recipe.
async fn link_associations(
    conn: &mut AsyncPgConnection,
    recipe_id: i32,
    write: &RecipeWrite,
) -> Result<(), diesel::result::Error> {
    if !write.ingredients.is_empty() {
        let links: Vec<RecipeIngredientRow> = write
            .ingredients
            .iter()
            .map(|resolved| RecipeIngredientRow {
                recipe_id,
                ingredient_id: resolved.ingredient_id.get(),
                quantity: resolved.quantity.as_ref().map(ToString::to_string),
            })
            .collect();
        diesel::insert_into(recipe_ingredients::table)
            .values(&links)
            .execute(conn)
            .await?;
    }

    let tag_ids = ensure_tags(conn, &write.tag_names).await?;
    if !tag_ids.is_empty() {
        let links: Vec<RecipeTagRow> = tag_ids
            .into_iter()
            .map(|tag_id| RecipeTagRow { recipe_id, tag_id })
            .collect();
        diesel::insert_into(recipe_tags::table)
            .values(&links)
            .execute(conn)
            .await?;
    }
    Ok(())
}

/// Run one step of the recipe deletion plan, returning affected rows.
async fn delete_step(
    conn: &mut AsyncPgConnection,
    step: RecipeDeletionStep,
    recipe_id: i32,
) -> Result<usize, diesel::result::Error> {
    let comment_ids = recipe_comments::table
        .filter(recipe_comments::recipe_id.eq(recipe_id))
        .select(recipe_comments::id);
    match step {
        RecipeDeletionStep::CommentLikes => {
            diesel::delete(comment_likes::table.filter(comment_likes::comment_id.eq_any(comment_ids)))
                .execute(conn)
                .await
        }
        RecipeDeletionStep::CommentAuthors => {
            diesel::delete(
                comment_authors::table.filter(comment_authors::comment_id.eq_any(comment_ids)),
            )
            .execute(conn)
            .await
        }
        RecipeDeletionStep::Comments => {
            diesel::delete(recipe_comments::table.filter(recipe_comments::recipe_id.eq(recipe_id)))
                .execute(conn)
                .await
        }
        RecipeDeletionStep::Favorites => {
            diesel::delete(
                recipe_favorites::table.filter(recipe_favorites::recipe_id.eq(recipe_id)),
            )
            .execute(conn)
            .await
        }
        RecipeDeletionStep::RecipeAuthor => {
            diesel::delete(recipe_authors::table.filter(recipe_authors::recipe_id.eq(recipe_id)))
                .execute(conn)
                .await
        }
        RecipeDeletionStep::IngredientLinks => {
            diesel::delete(
                recipe_ingredients::table.filter(recipe_ingredients::recipe_id.eq(recipe_id)),
            )
            .execute(conn)
            .await
        }
        RecipeDeletionStep::TagLinks => {
            diesel::delete(recipe_tags::table.filter(recipe_tags::recipe_id.eq(recipe_id)))
                .execute(conn)
                .await
        }
        RecipeDeletionStep::Recipe => {
            diesel::delete(recipes::table.find(recipe_id))
                .execute(conn)
                .await
        }
    }
}

// ---------------------------------------------------------------------------
// Read helpers
// ---------------------------------------------------------------------------

async fn load_decoration_rows(
    conn: &mut AsyncPgConnection,
    ids: &[i32],
) -> Result<RecipeDecorations, diesel::result::Error> {
    let mut decorations = RecipeDecorations::default();

    let authors: Vec<(i32, String)> = recipe_authors::table
        .inner_join(users::table)
        .filter(recipe_authors::recipe_id.eq_any(ids))
        .select((recipe_authors::recipe_id, users::username))
        .load(conn)
        .await?;
    decorations.authors = authors
        .into_iter()
        .map(|(id, name)| (RecipeId::new(id), name))
        .collect();

    let favorites: Vec<(i32, i64)> = recipe_favorites::table
        .filter(recipe_favorites::recipe_id.eq_any(ids))
        .group_by(recipe_favorites::recipe_id)
        .select((recipe_favorites::recipe_id, count(recipe_favorites::user_id)))
        .load(conn)
        .await?;
    decorations.favorite_counts = favorites
        .into_iter()
        .map(|(id, total)| (RecipeId::new(id), total))
        .collect();

    let measurements: Vec<(i32, i32, String, Option<String>)> = recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(ids))
        .order((lower(ingredients::name).asc(), ingredients::id.asc()))
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            recipe_ingredients::quantity,
        ))
        .load(conn)
        .await?;
    for (recipe_id, ingredient_id, name, quantity) in measurements {
        decorations
            .measurements
            .entry(RecipeId::new(recipe_id))
            .or_default()
            .push(IngredientMeasurement {
                ingredient_id: IngredientId::new(ingredient_id),
                name,
                quantity,
            });
    }

    let tag_rows: Vec<(i32, i32, String)> = recipe_tags::table
        .inner_join(tags::table)
        .filter(recipe_tags::recipe_id.eq_any(ids))
        .order((lower(tags::name).asc(), tags::id.asc()))
        .select((recipe_tags::recipe_id, tags::id, tags::name))
        .load(conn)
        .await?;
    for (recipe_id, tag_id, name) in tag_rows {
        decorations
            .tags
            .entry(RecipeId::new(recipe_id))
            .or_default()
            .push(Tag {
                id: TagId::new(tag_id),
                name,
            });
    }

    let comment_rows: Vec<CommentRow> = recipe_comments::table
        .filter(recipe_comments::recipe_id.eq_any(ids))
        .select(CommentRow::as_select())
        .load(conn)
        .await?;
    let comment_ids: Vec<i32> = comment_rows.iter().map(|row| row.id).collect();
    let comment_decorations = load_comment_decorations(conn, &comment_ids).await?;
    decorations.comment_authors = comment_decorations.authors;
    decorations.comment_likes = comment_decorations.likes;

    let mut comments: HashMap<RecipeId, Vec<CommentRecord>> = HashMap::new();
    for row in comment_rows {
        let record = row_to_comment(row);
        comments.entry(record.recipe_id).or_default().push(record);
    }
    decorations.comments = comments;

    Ok(decorations)
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(
        &self,
        author: UserId,
        write: &RecipeWrite,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = conn
            .transaction(|conn| {
                async move {
                    let fields = &write.fields;
                    let id = diesel::insert_into(recipes::table)
                        .values(&NewRecipeRow {
                            title: &fields.title,
                            description: fields.description.as_deref(),
                            instructions: fields.instructions.as_deref(),
                            prep_time: fields.prep_time,
                            cook_time: fields.cook_time,
                            created_at,
                        })
                        .returning(recipes::id)
                        .get_result::<i32>(conn)
                        .await?;
                    diesel::insert_into(recipe_authors::table)
                        .values(&RecipeAuthorRow {
                            recipe_id: id,
                            user_id: author.get(),
                        })
                        .execute(conn)
                        .await?;
                    link_associations(conn, id, write).await?;
                    Ok(id)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(RecipeId::new(id))
    }

    async fn update(
        &self,
        id: RecipeId,
        write: &RecipeWrite,
    ) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let fields = &write.fields;
                let updated = diesel::update(recipes::table.find(id.get()))
                    .set(&RecipeUpdate {
                        title: &fields.title,
                        description: fields.description.as_deref(),
                        instructions: fields.instructions.as_deref(),
                        prep_time: fields.prep_time,
                        cook_time: fields.cook_time,
                    })
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Ok(false);
                }
                delete_step(conn, RecipeDeletionStep::IngredientLinks, id.get()).await?;
                delete_step(conn, RecipeDeletionStep::TagLinks, id.get()).await?;
                link_associations(conn, id.get(), write).await?;
                Ok(true)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut removed = 0;
                for step in RECIPE_DELETION_PLAN {
                    let affected = delete_step(conn, step, id.get()).await?;
                    if step == RecipeDeletionStep::Recipe {
                        removed = affected;
                    }
                }
                Ok(removed > 0)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }

    async fn exists(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(recipes::table.find(id.get())))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn list_records(
        &self,
        search: &RecipeSearch,
    ) -> Result<Vec<RecipeRecord>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = recipes::table
            .select(RecipeRow::as_select())
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .into_boxed();
        for term in search.terms() {
            query = query.filter(term_predicate(term, search.scope()));
        }
        let rows: Vec<RecipeRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_record).collect())
    }

    async fn find_record(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeRecord>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = recipes::table
            .find(id.get())
            .select(RecipeRow::as_select())
            .first::<RecipeRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_record))
    }

    async fn load_decorations(
        &self,
        ids: &[RecipeId],
    ) -> Result<RecipeDecorations, RecipeRepositoryError> {
        if ids.is_empty() {
            return Ok(RecipeDecorations::default());
        }
        let raw = raw_ids(ids);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        // One snapshot for every decoration query.
        conn.transaction(|conn| async move { load_decoration_rows(conn, &raw).await }.scope_boxed())
            .await
            .map_err(map_diesel_error)
    }

    async fn author_of(&self, id: RecipeId) -> Result<Option<UserId>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let author = recipe_authors::table
            .find(id.get())
            .select(recipe_authors::user_id)
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(author.map(UserId::new))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("egg", "%egg%")]
    #[case("50%", "%50\\%%")]
    #[case("a_b", "%a\\_b%")]
    #[case("back\\slash", "%back\\\\slash%")]
    fn like_patterns_escape_wildcards(#[case] term: &str, #[case] expected: &str) {
        assert_eq!(contains_pattern(term), expected);
    }

    #[rstest]
    fn rows_convert_to_records() {
        let created_at = Utc::now();
        let record = row_to_record(RecipeRow {
            id: 4,
            title: "Soup".to_owned(),
            description: None,
            instructions: Some("Simmer".to_owned()),
            prep_time: Some(5),
            cook_time: None,
            created_at,
        });

        assert_eq!(record.id, RecipeId::new(4));
        assert_eq!(record.fields.title, "Soup");
        assert_eq!(record.fields.instructions.as_deref(), Some("Simmer"));
        assert_eq!(record.created_at, created_at);
    }

    #[rstest]
    fn pool_errors_map_to_connection_errors() {
        let err = map_pool_error(PoolError::checkout("refused"));
        assert!(matches!(err, RecipeRepositoryError::Connection { .. }));
    }
}
