//! Driving port for comments, likes and favourites.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Error, RecipeId, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementCommand: Send + Sync {
    async fn add_comment(
        &self,
        actor: &User,
        recipe_id: RecipeId,
        content: &str,
    ) -> Result<Comment, Error>;

    /// Delete a comment. Its author or an administrator only.
    async fn delete_comment(
        &self,
        actor: &User,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<Comment, Error>;

    async fn like_comment(
        &self,
        actor: &User,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<CommentId, Error>;

    async fn unlike_comment(
        &self,
        actor: &User,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<CommentId, Error>;

    async fn add_favorite(&self, actor: &User, recipe_id: RecipeId) -> Result<RecipeId, Error>;

    /// Removing a favourite that does not exist succeeds.
    async fn remove_favorite(&self, actor: &User, recipe_id: RecipeId)
    -> Result<RecipeId, Error>;
}

/// Fixture implementation where no recipe exists.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEngagementCommand;

#[async_trait]
impl EngagementCommand for FixtureEngagementCommand {
    async fn add_comment(
        &self,
        _actor: &User,
        _recipe_id: RecipeId,
        _content: &str,
    ) -> Result<Comment, Error> {
        Err(Error::not_found("Recipe not found"))
    }

    async fn delete_comment(
        &self,
        _actor: &User,
        _recipe_id: RecipeId,
        _comment_id: CommentId,
    ) -> Result<Comment, Error> {
        Err(Error::not_found("Comment not found"))
    }

    async fn like_comment(
        &self,
        _actor: &User,
        _recipe_id: RecipeId,
        _comment_id: CommentId,
    ) -> Result<CommentId, Error> {
        Err(Error::not_found("Comment not found"))
    }

    async fn unlike_comment(
        &self,
        _actor: &User,
        _recipe_id: RecipeId,
        _comment_id: CommentId,
    ) -> Result<CommentId, Error> {
        Err(Error::not_found("Comment not found"))
    }

    async fn add_favorite(&self, _actor: &User, _recipe_id: RecipeId) -> Result<RecipeId, Error> {
        Err(Error::not_found("Recipe not found"))
    }

    async fn remove_favorite(
        &self,
        _actor: &User,
        recipe_id: RecipeId,
    ) -> Result<RecipeId, Error> {
        Ok(recipe_id)
    }
}
