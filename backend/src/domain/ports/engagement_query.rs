//! Driving port for engagement reads.

use async_trait::async_trait;

use crate::domain::{Comment, CommentId, Error, RecipeId, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementQuery: Send + Sync {
    /// Decorated comments of a recipe, newest first.
    async fn comments(&self, recipe_id: RecipeId) -> Result<Vec<Comment>, Error>;

    /// Comment ids on a recipe liked by `actor`.
    async fn liked_comments(&self, actor: &User, recipe_id: RecipeId)
    -> Result<Vec<CommentId>, Error>;

    /// Recipe ids favourited by `actor`.
    async fn favorites(&self, actor: &User) -> Result<Vec<RecipeId>, Error>;
}

/// Fixture implementation with no engagement.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEngagementQuery;

#[async_trait]
impl EngagementQuery for FixtureEngagementQuery {
    async fn comments(&self, _recipe_id: RecipeId) -> Result<Vec<Comment>, Error> {
        Ok(Vec::new())
    }

    async fn liked_comments(
        &self,
        _actor: &User,
        _recipe_id: RecipeId,
    ) -> Result<Vec<CommentId>, Error> {
        Ok(Vec::new())
    }

    async fn favorites(&self, _actor: &User) -> Result<Vec<RecipeId>, Error> {
        Ok(Vec::new())
    }
}
