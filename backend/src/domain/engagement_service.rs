//! Comments, comment likes and favourites.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{
    EngagementCommand, EngagementQuery, EngagementRepository, EngagementRepositoryError,
    RecipeRepository,
};
use crate::domain::recipe_service::map_recipe_error;
use crate::domain::{
    Comment, CommentContent, CommentId, CommentRecord, Error, RecipeId, User, assemble_comments,
    require_admin_or_owner,
};

/// Engagement service implementing the engagement driving ports.
#[derive(Clone)]
pub struct EngagementService<E, R> {
    engagement: Arc<E>,
    recipes: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<E, R> EngagementService<E, R> {
    pub fn new(engagement: Arc<E>, recipes: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            engagement,
            recipes,
            clock,
        }
    }
}

fn map_engagement_error(error: EngagementRepositoryError) -> Error {
    match error {
        EngagementRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("engagement repository unavailable: {message}"))
        }
        EngagementRepositoryError::Query { message } => {
            Error::internal(format!("engagement repository error: {message}"))
        }
    }
}

fn comment_not_found() -> Error {
    Error::not_found("Comment not found")
}

impl<E, R> EngagementService<E, R>
where
    E: EngagementRepository,
    R: RecipeRepository,
{
    async fn ensure_recipe(&self, recipe_id: RecipeId) -> Result<(), Error> {
        if self
            .recipes
            .exists(recipe_id)
            .await
            .map_err(map_recipe_error)?
        {
            Ok(())
        } else {
            Err(Error::not_found("Recipe not found"))
        }
    }

    async fn find_comment(
        &self,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<CommentRecord, Error> {
        self.engagement
            .find_comment(recipe_id, comment_id)
            .await
            .map_err(map_engagement_error)?
            .ok_or_else(comment_not_found)
    }

    async fn decorate(&self, records: Vec<CommentRecord>) -> Result<Vec<Comment>, Error> {
        if records.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<CommentId> = records.iter().map(|record| record.id).collect();
        let decorations = self
            .engagement
            .comment_decorations(&ids)
            .await
            .map_err(map_engagement_error)?;
        Ok(assemble_comments(records, &decorations))
    }
}

#[async_trait]
impl<E, R> EngagementCommand for EngagementService<E, R>
where
    E: EngagementRepository,
    R: RecipeRepository,
{
    async fn add_comment(
        &self,
        actor: &User,
        recipe_id: RecipeId,
        content: &str,
    ) -> Result<Comment, Error> {
        let content =
            CommentContent::new(content).map_err(|err| Error::invalid_request(err.to_string()))?;
        self.ensure_recipe(recipe_id).await?;
        let record = self
            .engagement
            .insert_comment(recipe_id, actor.id, &content, self.clock.utc())
            .await
            .map_err(map_engagement_error)?;
        Ok(Comment::decorate(
            record,
            Some(actor.username.to_string()),
            0,
        ))
    }

    async fn delete_comment(
        &self,
        actor: &User,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<Comment, Error> {
        let record = self.find_comment(recipe_id, comment_id).await?;
        let author = self
            .engagement
            .comment_author(comment_id)
            .await
            .map_err(map_engagement_error)?;
        require_admin_or_owner(actor, author)?;

        let comment = self
            .decorate(vec![record])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::internal("decorated comment went missing"))?;
        if !self
            .engagement
            .delete_comment(comment_id)
            .await
            .map_err(map_engagement_error)?
        {
            return Err(comment_not_found());
        }
        Ok(comment)
    }

    async fn like_comment(
        &self,
        actor: &User,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<CommentId, Error> {
        self.find_comment(recipe_id, comment_id).await?;
        self.engagement
            .add_like(comment_id, actor.id)
            .await
            .map_err(map_engagement_error)?;
        Ok(comment_id)
    }

    async fn unlike_comment(
        &self,
        actor: &User,
        recipe_id: RecipeId,
        comment_id: CommentId,
    ) -> Result<CommentId, Error> {
        self.find_comment(recipe_id, comment_id).await?;
        self.engagement
            .remove_like(comment_id, actor.id)
            .await
            .map_err(map_engagement_error)?;
        Ok(comment_id)
    }

    async fn add_favorite(&self, actor: &User, recipe_id: RecipeId) -> Result<RecipeId, Error> {
        self.ensure_recipe(recipe_id).await?;
        self.engagement
            .add_favorite(recipe_id, actor.id)
            .await
            .map_err(map_engagement_error)?;
        Ok(recipe_id)
    }

    async fn remove_favorite(&self, actor: &User, recipe_id: RecipeId) -> Result<RecipeId, Error> {
        self.engagement
            .remove_favorite(recipe_id, actor.id)
            .await
            .map_err(map_engagement_error)?;
        Ok(recipe_id)
    }
}

#[async_trait]
impl<E, R> EngagementQuery for EngagementService<E, R>
where
    E: EngagementRepository,
    R: RecipeRepository,
{
    async fn comments(&self, recipe_id: RecipeId) -> Result<Vec<Comment>, Error> {
        self.ensure_recipe(recipe_id).await?;
        let records = self
            .engagement
            .list_comments(recipe_id)
            .await
            .map_err(map_engagement_error)?;
        self.decorate(records).await
    }

    async fn liked_comments(
        &self,
        actor: &User,
        recipe_id: RecipeId,
    ) -> Result<Vec<CommentId>, Error> {
        self.engagement
            .liked_comment_ids(recipe_id, actor.id)
            .await
            .map_err(map_engagement_error)
    }

    async fn favorites(&self, actor: &User) -> Result<Vec<RecipeId>, Error> {
        self.engagement
            .favorite_recipe_ids(actor.id)
            .await
            .map_err(map_engagement_error)
    }
}

#[cfg(test)]
#[path = "engagement_service_tests.rs"]
mod tests;
