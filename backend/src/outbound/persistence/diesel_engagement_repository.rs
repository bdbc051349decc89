//! PostgreSQL-backed comments, comment likes and favourites.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::dsl::count;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{EngagementRepository, EngagementRepositoryError};
use crate::domain::{
    COMMENT_DELETION_PLAN, CommentContent, CommentDecorations, CommentDeletionStep, CommentId,
    CommentRecord, RecipeId, UserId,
};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CommentAuthorRow, CommentLikeRow, CommentRow, FavoriteRow, NewCommentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comment_authors, comment_likes, recipe_comments, recipe_favorites, users};

/// Diesel-backed implementation of the engagement port.
#[derive(Clone)]
pub struct DieselEngagementRepository {
    pool: DbPool,
}

impl DieselEngagementRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EngagementRepositoryError {
    map_basic_pool_error(error, EngagementRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EngagementRepositoryError {
    map_basic_diesel_error(
        error,
        EngagementRepositoryError::query,
        EngagementRepositoryError::connection,
    )
}

pub(super) fn row_to_comment(row: CommentRow) -> CommentRecord {
    CommentRecord {
        id: CommentId::new(row.id),
        recipe_id: RecipeId::new(row.recipe_id),
        content: row.content,
        created_at: row.created_at,
    }
}

/// Authors and like counts for a comment id set, two queries in total.
pub(super) async fn load_comment_decorations(
    conn: &mut AsyncPgConnection,
    ids: &[i32],
) -> Result<CommentDecorations, diesel::result::Error> {
    if ids.is_empty() {
        return Ok(CommentDecorations::default());
    }
    let authors: Vec<(i32, String)> = comment_authors::table
        .inner_join(users::table)
        .filter(comment_authors::comment_id.eq_any(ids))
        .select((comment_authors::comment_id, users::username))
        .load(conn)
        .await?;
    let likes: Vec<(i32, i64)> = comment_likes::table
        .filter(comment_likes::comment_id.eq_any(ids))
        .group_by(comment_likes::comment_id)
        .select((comment_likes::comment_id, count(comment_likes::user_id)))
        .load(conn)
        .await?;

    Ok(CommentDecorations {
        authors: authors
            .into_iter()
            .map(|(id, name)| (CommentId::new(id), name))
            .collect(),
        likes: likes
            .into_iter()
            .map(|(id, total)| (CommentId::new(id), total))
            .collect(),
    })
}

async fn delete_comment_step(
    conn: &mut AsyncPgConnection,
    step: CommentDeletionStep,
    comment_id: i32,
) -> Result<usize, diesel::result::Error> {
    match step {
        CommentDeletionStep::Likes => {
            diesel::delete(comment_likes::table.filter(comment_likes::comment_id.eq(comment_id)))
                .execute(conn)
                .await
        }
        CommentDeletionStep::Author => {
            diesel::delete(comment_authors::table.find(comment_id))
                .execute(conn)
                .await
        }
        CommentDeletionStep::Comment => {
            diesel::delete(recipe_comments::table.find(comment_id))
                .execute(conn)
                .await
        }
    }
}

#[async_trait]
impl EngagementRepository for DieselEngagementRepository {
    async fn list_comments(
        &self,
        recipe_id: RecipeId,
    ) -> Result<Vec<CommentRecord>, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CommentRow> = recipe_comments::table
            .filter(recipe_comments::recipe_id.eq(recipe_id.get()))
            .order((recipe_comments::created_at.desc(), recipe_comments::id.desc()))
            .select(CommentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_comment).collect())
    }

    async fn comment_decorations(
        &self,
        ids: &[CommentId],
    ) -> Result<CommentDecorations, EngagementRepositoryError> {
        if ids.is_empty() {
            return Ok(CommentDecorations::default());
        }
        let raw: Vec<i32> = ids.iter().map(|id| id.get()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        load_comment_decorations(&mut conn, &raw)
            .await
            .map_err(map_diesel_error)
    }

    async fn insert_comment(
        &self,
        recipe_id: RecipeId,
        author: UserId,
        content: &CommentContent,
        created_at: DateTime<Utc>,
    ) -> Result<CommentRecord, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = conn
            .transaction(|conn| {
                async move {
                    let row = diesel::insert_into(recipe_comments::table)
                        .values(&NewCommentRow {
                            recipe_id: recipe_id.get(),
                            content: content.as_ref(),
                            created_at,
                        })
                        .returning(CommentRow::as_returning())
                        .get_result::<CommentRow>(conn)
                        .await?;
                    diesel::insert_into(comment_authors::table)
                        .values(&CommentAuthorRow {
                            comment_id: row.id,
                            user_id: author.get(),
                        })
                        .execute(conn)
                        .await?;
                    Ok(row)
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        Ok(row_to_comment(row))
    }

    async fn find_comment(
        &self,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<Option<CommentRecord>, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = recipe_comments::table
            .filter(recipe_comments::id.eq(comment_id.get()))
            .filter(recipe_comments::recipe_id.eq(recipe_id.get()))
            .select(CommentRow::as_select())
            .first::<CommentRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_comment))
    }

    async fn comment_author(
        &self,
        comment_id: CommentId,
    ) -> Result<Option<UserId>, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let author = comment_authors::table
            .find(comment_id.get())
            .select(comment_authors::user_id)
            .first::<i32>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(author.map(UserId::new))
    }

    async fn delete_comment(
        &self,
        comment_id: CommentId,
    ) -> Result<bool, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let mut removed = 0;
                for step in COMMENT_DELETION_PLAN {
                    let affected = delete_comment_step(conn, step, comment_id.get()).await?;
                    if step == CommentDeletionStep::Comment {
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

    async fn add_like(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(comment_likes::table)
            .values(&CommentLikeRow {
                comment_id: comment_id.get(),
                user_id: user_id.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove_like(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(comment_likes::table.find((comment_id.get(), user_id.get())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn liked_comment_ids(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<Vec<CommentId>, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i32> = comment_likes::table
            .inner_join(recipe_comments::table)
            .filter(recipe_comments::recipe_id.eq(recipe_id.get()))
            .filter(comment_likes::user_id.eq(user_id.get()))
            .order(comment_likes::comment_id.asc())
            .select(comment_likes::comment_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(CommentId::new).collect())
    }

    async fn add_favorite(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(recipe_favorites::table)
            .values(&FavoriteRow {
                recipe_id: recipe_id.get(),
                user_id: user_id.get(),
            })
            .on_conflict_do_nothing()
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn remove_favorite(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(recipe_favorites::table.find((recipe_id.get(), user_id.get())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn favorite_recipe_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<RecipeId>, EngagementRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let ids: Vec<i32> = recipe_favorites::table
            .filter(recipe_favorites::user_id.eq(user_id.get()))
            .order((recipe_favorites::created_at.desc(), recipe_favorites::recipe_id.desc()))
            .select(recipe_favorites::recipe_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(RecipeId::new).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn comment_rows_keep_their_recipe() {
        let created_at = Utc::now();
        let record = row_to_comment(CommentRow {
            id: 3,
            recipe_id: 9,
            content: "Tasty".to_owned(),
            created_at,
        });

        assert_eq!(record.id, CommentId::new(3));
        assert_eq!(record.recipe_id, RecipeId::new(9));
        assert_eq!(record.content, "Tasty");
    }

    #[rstest]
    fn diesel_errors_map_to_query_errors() {
        let err = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(err, EngagementRepositoryError::Query { .. }));
    }
}
