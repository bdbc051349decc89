//! Recipe HTTP handlers.
//!
//! ```text
//! GET    /api/v1/recipes?query=egg,basil&scope=all
//! GET    /api/v1/recipes/search?query=egg&scope=ingredients
//! GET    /api/v1/recipes/{recipe_id}
//! POST   /api/v1/recipes
//! PUT    /api/v1/recipes/{recipe_id}
//! DELETE /api/v1/recipes/{recipe_id}
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::RecipeId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

pub use super::recipes_dto::{
    IngredientLineRequest, IngredientMeasurementResponse, RecipeRequest, RecipeResponse,
    SearchParams, TagNameRequest,
};
use super::recipes_dto::{parse_recipe_request, parse_search};

async fn search_recipes(
    state: &HttpState,
    params: SearchParams,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let recipe_search = parse_search(params)?;
    let recipes = state.recipes_query.list(&recipe_search).await?;
    Ok(web::Json(recipes.into_iter().map(Into::into).collect()))
}

/// List recipes, newest first, optionally filtered by a scoped search.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(SearchParams),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid scope", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    search_recipes(&state, params.into_inner()).await
}

/// Search recipes. Unlike the listing, `query` must be supplied.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching recipes", body = [RecipeResponse]),
        (status = 400, description = "Missing query or invalid scope", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "searchRecipes",
    security([])
)]
#[get("/recipes/search")]
pub async fn search(
    state: web::Data<HttpState>,
    params: web::Query<SearchParams>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let params = params.into_inner();
    if params.query.is_none() {
        return Err(missing_field_error(FieldName::new("query")));
    }
    search_recipes(&state, params).await
}

/// Fetch one decorated recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{recipe_id}",
    params(("recipe_id" = i32, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe", body = RecipeResponse),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{recipe_id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    path: web::Path<i32>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let recipe = state
        .recipes_query
        .get(RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(recipe.into()))
}

/// Create a recipe. Every ingredient must already exist in the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid recipe", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let draft = parse_recipe_request(payload.into_inner())?;
    let recipe = state.recipes.create(&user.0, draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(recipe)))
}

/// Replace a recipe's fields, ingredients and tags.
#[utoipa::path(
    put,
    path = "/api/v1/recipes/{recipe_id}",
    params(("recipe_id" = i32, Path, description = "Recipe identifier")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid recipe", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[put("/recipes/{recipe_id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i32>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let draft = parse_recipe_request(payload.into_inner())?;
    let recipe = state
        .recipes
        .update(&user.0, RecipeId::new(path.into_inner()), draft)
        .await?;
    Ok(web::Json(recipe.into()))
}

/// Delete a recipe with its comments, likes and favourites.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{recipe_id}",
    params(("recipe_id" = i32, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Deleted recipe", body = RecipeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Author or administrator only", body = ErrorSchema),
        (status = 404, description = "Recipe not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{recipe_id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<RecipeResponse>> {
    let recipe = state
        .recipes
        .delete(&user.0, RecipeId::new(path.into_inner()))
        .await?;
    Ok(web::Json(recipe.into()))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
