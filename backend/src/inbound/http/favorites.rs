//! Favourite HTTP handlers.
//!
//! ```text
//! GET    /api/v1/favorites
//! POST   /api/v1/recipes/{recipe_id}/favorite
//! DELETE /api/v1/recipes/{recipe_id}/favorite
//! ```

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::RecipeId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Acknowledges a favourite toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteResponse {
    pub recipe_id: i32,
    pub favorited: bool,
}

/// Recipes favourited by the caller.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritesResponse {
    pub recipe_ids: Vec<i32>,
}

/// List the caller's favourite recipe ids.
#[utoipa::path(
    get,
    path = "/api/v1/favorites",
    responses(
        (status = 200, description = "Favourite recipe ids", body = FavoritesResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "listFavorites"
)]
#[get("/favorites")]
pub async fn list_favorites(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<FavoritesResponse>> {
    let ids = state.engagement_query.favorites(&user.0).await?;
    Ok(web::Json(FavoritesResponse {
        recipe_ids: ids.into_iter().map(RecipeId::get).collect(),
    }))
}

/// Favourite a recipe. Repeating the call changes nothing.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{recipe_id}/favorite",
    params(("recipe_id" = i32, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe favourited", body = FavoriteResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{recipe_id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<FavoriteResponse>> {
    let recipe_id = state
        .engagement
        .add_favorite(&user.0, RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(FavoriteResponse {
        recipe_id: recipe_id.get(),
        favorited: true,
    }))
}

/// Remove a favourite. Succeeds when none exists.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{recipe_id}/favorite",
    params(("recipe_id" = i32, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Favourite removed", body = FavoriteResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["favorites"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{recipe_id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<FavoriteResponse>> {
    let recipe_id = state
        .engagement
        .remove_favorite(&user.0, RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(FavoriteResponse {
        recipe_id: recipe_id.get(),
        favorited: false,
    }))
}
