//! Ingredient and tag catalogue HTTP handlers.
//!
//! ```text
//! GET    /api/v1/ingredients
//! POST   /api/v1/ingredients                   {"name":"Basil"}
//! PUT    /api/v1/ingredients/{ingredient_id}   {"name":"Thai basil"}
//! DELETE /api/v1/ingredients/{ingredient_id}
//! GET    /api/v1/tags
//! POST   /api/v1/tags                          {"name":"Vegan"}
//! ```
//!
//! Ingredient maintenance is reserved for administrators; any signed-in user
//! may add a tag. The domain services enforce both rules.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, Ingredient, IngredientId, IngredientSummary, Tag};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::CurrentUser;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_field};

/// Request payload naming a catalogue entry.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NameRequest {
    #[schema(example = "basil")]
    pub name: Option<String>,
}

impl NameRequest {
    fn into_name(self) -> Result<String, Error> {
        require_field(self.name, FieldName::new("name"))
    }
}

/// Catalogue ingredient with the number of recipes using it.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientResponse {
    pub id: i32,
    pub name: String,
    pub recipe_count: i64,
}

impl From<Ingredient> for IngredientResponse {
    fn from(value: Ingredient) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
            recipe_count: value.recipe_count,
        }
    }
}

/// Ingredient reference attached to a recipe.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientSummaryResponse {
    pub id: i32,
    pub name: String,
}

impl From<IngredientSummary> for IngredientSummaryResponse {
    fn from(value: IngredientSummary) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
        }
    }
}

/// Recipe label.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(value: Tag) -> Self {
        Self {
            id: value.id.get(),
            name: value.name,
        }
    }
}

/// List catalogue ingredients alphabetically.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    responses(
        (status = 200, description = "Ingredients", body = [IngredientResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<IngredientResponse>>> {
    let ingredients = state.catalogue_query.ingredients().await?;
    Ok(web::Json(ingredients.into_iter().map(Into::into).collect()))
}

/// Add an ingredient to the catalogue.
#[utoipa::path(
    post,
    path = "/api/v1/ingredients",
    request_body = NameRequest,
    responses(
        (status = 201, description = "Ingredient created", body = IngredientResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 409, description = "Ingredient already exists", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createIngredient"
)]
#[post("/ingredients")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<NameRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload.into_inner().into_name()?;
    let ingredient = state.catalogue.create_ingredient(&user.0, &name).await?;
    Ok(HttpResponse::Created().json(IngredientResponse::from(ingredient)))
}

/// Rename an ingredient.
#[utoipa::path(
    put,
    path = "/api/v1/ingredients/{ingredient_id}",
    params(("ingredient_id" = i32, Path, description = "Ingredient identifier")),
    request_body = NameRequest,
    responses(
        (status = 200, description = "Ingredient renamed", body = IngredientResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Ingredient not found", body = ErrorSchema),
        (status = 409, description = "Name already taken", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "renameIngredient"
)]
#[put("/ingredients/{ingredient_id}")]
pub async fn rename_ingredient(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i32>,
    payload: web::Json<NameRequest>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let name = payload.into_inner().into_name()?;
    let ingredient = state
        .catalogue
        .rename_ingredient(&user.0, IngredientId::new(path.into_inner()), &name)
        .await?;
    Ok(web::Json(ingredient.into()))
}

/// Remove an ingredient no recipe uses.
#[utoipa::path(
    delete,
    path = "/api/v1/ingredients/{ingredient_id}",
    params(("ingredient_id" = i32, Path, description = "Ingredient identifier")),
    responses(
        (status = 200, description = "Deleted ingredient", body = IngredientResponse),
        (status = 403, description = "Administrators only", body = ErrorSchema),
        (status = 404, description = "Ingredient not found", body = ErrorSchema),
        (status = 409, description = "Ingredient still used by recipes", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "deleteIngredient"
)]
#[delete("/ingredients/{ingredient_id}")]
pub async fn delete_ingredient(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i32>,
) -> ApiResult<web::Json<IngredientResponse>> {
    let ingredient = state
        .catalogue
        .delete_ingredient(&user.0, IngredientId::new(path.into_inner()))
        .await?;
    Ok(web::Json(ingredient.into()))
}

/// List tags alphabetically.
#[utoipa::path(
    get,
    path = "/api/v1/tags",
    responses(
        (status = 200, description = "Tags", body = [TagResponse]),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "listTags",
    security([])
)]
#[get("/tags")]
pub async fn list_tags(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<TagResponse>>> {
    let tags = state.catalogue_query.tags().await?;
    Ok(web::Json(tags.into_iter().map(Into::into).collect()))
}

/// Add a tag explicitly. Recipe writes also create tags on first use.
#[utoipa::path(
    post,
    path = "/api/v1/tags",
    request_body = NameRequest,
    responses(
        (status = 201, description = "Tag created", body = TagResponse),
        (status = 400, description = "Invalid name", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Tag already exists", body = ErrorSchema)
    ),
    tags = ["catalogue"],
    operation_id = "createTag"
)]
#[post("/tags")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    user: CurrentUser,
    payload: web::Json<NameRequest>,
) -> ApiResult<HttpResponse> {
    let name = payload.into_inner().into_name()?;
    let tag = state.catalogue.create_tag(&user.0, &name).await?;
    Ok(HttpResponse::Created().json(TagResponse::from(tag)))
}
