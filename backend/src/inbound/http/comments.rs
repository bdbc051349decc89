//! Comment and comment-like HTTP handlers.
//!
//! ```text
//! GET    /api/v1/recipes/{recipe_id}/comments
//! POST   /api/v1/recipes/{recipe_id}/comments                {"content":"Lovely"}
//! DELETE /api/v1/recipes/{recipe_id}/comments/{comment_id}
//! GET    /api/v1/recipes/{recipe_id}/comments/liked
//! POST   /api/v1/recipes/{recipe_id}/comments/{comment_id}/like
//! DELETE /api/v1/recipes/{recipe_id}/comments/{comment_id}/like
//! ```
//!
//! Likes have set semantics: liking twice or unliking an unliked comment both
//! succeed.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Comment, CommentId, RecipeId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_field};

/// Request payload for a new comment.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[schema(example = "Lovely with extra chilli")]
    pub content: Option<String>,
}

/// Comment decorated with its author and like count.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentResponse {
    pub id: i32,
    pub recipe_id: i32,
    pub content: String,
    pub created_at: String,
    pub created_by_username: Option<String>,
    pub like_count: i64,
}

impl From<Comment> for CommentResponse {
    fn from(value: Comment) -> Self {
        Self {
            id: value.id.get(),
            recipe_id: value.recipe_id.get(),
            content: value.content,
            created_at: value.created_at.to_rfc3339(),
            created_by_username: value.created_by_username,
            like_count: value.like_count,
        }
    }
}

/// Acknowledges a like toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentLikeResponse {
    pub comment_id: i32,
    pub liked: bool,
}

/// Comment ids the caller has liked on one recipe.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikedCommentsResponse {
    pub comment_ids: Vec<i32>,
}

#[derive(Debug, Deserialize)]
struct CommentPath {
    recipe_id: i32,
    comment_id: i32,
}

impl CommentPath {
    fn ids(&self) -> (RecipeId, CommentId) {
        (RecipeId::new(self.recipe_id), CommentId::new(self.comment_id))
    }
}

/// List a recipe's comments, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{recipe_id}/comments",
    params(("recipe_id" = i32, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Comments", body = [CommentResponse]),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "listComments",
    security([])
)]
#[get("/recipes/{recipe_id}/comments")]
pub async fn list_comments(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Vec<CommentResponse>>> {
    let comments = state
        .engagement_query
        .comments(RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(comments.into_iter().map(Into::into).collect()))
}

/// Comment on a recipe as the signed-in user.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{recipe_id}/comments",
    params(("recipe_id" = i32, Path, description = "Recipe identifier")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment created", body = CommentResponse),
        (status = 400, description = "Empty comment", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "addComment"
)]
#[post("/recipes/{recipe_id}/comments")]
pub async fn add_comment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i32>,
    payload: web::Json<CommentRequest>,
) -> ApiResult<HttpResponse> {
    let content = require_field(payload.into_inner().content, FieldName::new("content"))?;
    let comment = state
        .engagement
        .add_comment(&user.0, RecipeId::new(path.into_inner()), &content)
        .await?;
    Ok(HttpResponse::Created().json(CommentResponse::from(comment)))
}

/// Delete a comment together with its likes.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{recipe_id}/comments/{comment_id}",
    params(
        ("recipe_id" = i32, Path, description = "Recipe identifier"),
        ("comment_id" = i32, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Deleted comment", body = CommentResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Author or administrator only", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "deleteComment"
)]
#[delete("/recipes/{recipe_id}/comments/{comment_id}")]
pub async fn delete_comment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<CommentPath>,
) -> ApiResult<web::Json<CommentResponse>> {
    let (recipe_id, comment_id) = path.ids();
    let comment = state
        .engagement
        .delete_comment(&user.0, recipe_id, comment_id)
        .await?;
    Ok(web::Json(comment.into()))
}

/// Comments on a recipe liked by the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{recipe_id}/comments/liked",
    params(("recipe_id" = i32, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Liked comment ids", body = LikedCommentsResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "likedComments"
)]
#[get("/recipes/{recipe_id}/comments/liked")]
pub async fn liked_comments(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<LikedCommentsResponse>> {
    let ids = state
        .engagement_query
        .liked_comments(&user.0, RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(LikedCommentsResponse {
        comment_ids: ids.into_iter().map(CommentId::get).collect(),
    }))
}

/// Like a comment.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{recipe_id}/comments/{comment_id}/like",
    params(
        ("recipe_id" = i32, Path, description = "Recipe identifier"),
        ("comment_id" = i32, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Comment liked", body = CommentLikeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "likeComment"
)]
#[post("/recipes/{recipe_id}/comments/{comment_id}/like")]
pub async fn like_comment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<CommentPath>,
) -> ApiResult<web::Json<CommentLikeResponse>> {
    let (recipe_id, comment_id) = path.ids();
    let liked = state
        .engagement
        .like_comment(&user.0, recipe_id, comment_id)
        .await?;
    Ok(web::Json(CommentLikeResponse {
        comment_id: liked.get(),
        liked: true,
    }))
}

/// Withdraw a like.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{recipe_id}/comments/{comment_id}/like",
    params(
        ("recipe_id" = i32, Path, description = "Recipe identifier"),
        ("comment_id" = i32, Path, description = "Comment identifier")
    ),
    responses(
        (status = 200, description = "Like removed", body = CommentLikeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Comment not found", body = ErrorSchema)
    ),
    tags = ["comments"],
    operation_id = "unlikeComment"
)]
#[delete("/recipes/{recipe_id}/comments/{comment_id}/like")]
pub async fn unlike_comment(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<CommentPath>,
) -> ApiResult<web::Json<CommentLikeResponse>> {
    let (recipe_id, comment_id) = path.ids();
    let unliked = state
        .engagement
        .unlike_comment(&user.0, recipe_id, comment_id)
        .await?;
    Ok(web::Json(CommentLikeResponse {
        comment_id: unliked.get(),
        liked: false,
    }))
}
