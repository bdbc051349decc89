//! Port for comments, comment likes and favourites.
//!
//! Likes and favourites are set semantics: adding an existing pair and
//! removing an absent one both succeed without changing anything.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    CommentContent, CommentDecorations, CommentId, CommentRecord, RecipeId, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by engagement repository adapters.
    pub enum EngagementRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "engagement repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "engagement repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementRepository: Send + Sync {
    /// Base comment rows of a recipe.
    async fn list_comments(
        &self,
        recipe_id: RecipeId,
    ) -> Result<Vec<CommentRecord>, EngagementRepositoryError>;

    /// Batch-load authors and like counts for the given comments.
    async fn comment_decorations(
        &self,
        ids: &[CommentId],
    ) -> Result<CommentDecorations, EngagementRepositoryError>;

    /// Insert a comment together with its author link.
    async fn insert_comment(
        &self,
        recipe_id: RecipeId,
        author: UserId,
        content: &CommentContent,
        created_at: DateTime<Utc>,
    ) -> Result<CommentRecord, EngagementRepositoryError>;

    /// Comment belonging to the given recipe.
    async fn find_comment(
        &self,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<Option<CommentRecord>, EngagementRepositoryError>;

    async fn comment_author(
        &self,
        comment_id: CommentId,
    ) -> Result<Option<UserId>, EngagementRepositoryError>;

    /// Remove a comment following [`crate::domain::COMMENT_DELETION_PLAN`].
    async fn delete_comment(&self, comment_id: CommentId)
    -> Result<bool, EngagementRepositoryError>;

    async fn add_like(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError>;

    async fn remove_like(
        &self,
        comment_id: CommentId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError>;

    /// Comments of a recipe the user has liked.
    async fn liked_comment_ids(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<Vec<CommentId>, EngagementRepositoryError>;

    async fn add_favorite(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError>;

    async fn remove_favorite(
        &self,
        recipe_id: RecipeId,
        user_id: UserId,
    ) -> Result<(), EngagementRepositoryError>;

    async fn favorite_recipe_ids(
        &self,
        user_id: UserId,
    ) -> Result<Vec<RecipeId>, EngagementRepositoryError>;
}
