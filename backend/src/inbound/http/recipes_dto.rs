//! Recipe DTOs and parsing helpers.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    Error, IngredientLine, IngredientMeasurement, RecipeDraft, RecipeFields, RecipeSearch,
    RecipeView,
};
use crate::inbound::http::catalogue::{IngredientSummaryResponse, TagResponse};
use crate::inbound::http::comments::CommentResponse;
use crate::inbound::http::validation::{FieldName, invalid_value_error, require_field};

/// Listing and search parameters.
///
/// `query` is split on `,`, `;`, `:` and newlines; every term must match
/// within `scope` (`all`, `name`, `ingredients` or `tags`).
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchParams {
    #[param(example = "egg, basil")]
    pub query: Option<String>,
    #[param(example = "all")]
    pub scope: Option<String>,
}

/// One ingredient row of a recipe write. `name` may list several
/// ingredients sharing the same quantity.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientLineRequest {
    #[schema(example = "egg")]
    pub name: String,
    #[schema(example = "2 st")]
    pub quantity: Option<String>,
}

/// Tag reference of a recipe write. Unknown tags are created on the fly.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TagNameRequest {
    #[schema(example = "breakfast")]
    pub name: String,
}

/// Request payload for creating or replacing a recipe.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientLineRequest>,
    #[serde(default)]
    pub tags: Vec<TagNameRequest>,
}

/// Per-recipe quantity joined with its ingredient.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientMeasurementResponse {
    pub ingredient_id: i32,
    pub name: String,
    pub quantity: Option<String>,
}

impl From<IngredientMeasurement> for IngredientMeasurementResponse {
    fn from(value: IngredientMeasurement) -> Self {
        Self {
            ingredient_id: value.ingredient_id.get(),
            name: value.name,
            quantity: value.quantity,
        }
    }
}

/// Fully decorated recipe.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub instructions: Option<String>,
    pub prep_time: Option<i32>,
    pub cook_time: Option<i32>,
    pub created_at: String,
    pub created_by_username: Option<String>,
    pub favorite_count: i64,
    pub ingredients: Vec<IngredientSummaryResponse>,
    pub ingredient_measurements: Vec<IngredientMeasurementResponse>,
    pub tags: Vec<TagResponse>,
    pub comments: Vec<CommentResponse>,
}

impl From<RecipeView> for RecipeResponse {
    fn from(view: RecipeView) -> Self {
        let RecipeFields {
            title,
            description,
            instructions,
            prep_time,
            cook_time,
        } = view.fields;
        Self {
            id: view.id.get(),
            title,
            description,
            instructions,
            prep_time,
            cook_time,
            created_at: view.created_at.to_rfc3339(),
            created_by_username: view.created_by_username,
            favorite_count: view.favorite_count,
            ingredients: view.ingredients.into_iter().map(Into::into).collect(),
            ingredient_measurements: view
                .ingredient_measurements
                .into_iter()
                .map(Into::into)
                .collect(),
            tags: view.tags.into_iter().map(Into::into).collect(),
            comments: view.comments.into_iter().map(Into::into).collect(),
        }
    }
}

pub(super) fn parse_search(params: SearchParams) -> Result<RecipeSearch, Error> {
    let SearchParams { query, scope } = params;
    RecipeSearch::parse(query.as_deref(), scope.as_deref()).map_err(|err| {
        invalid_value_error(
            FieldName::new("scope"),
            err.to_string(),
            scope.as_deref().unwrap_or_default(),
        )
    })
}

pub(super) fn parse_recipe_request(payload: RecipeRequest) -> Result<RecipeDraft, Error> {
    let title = require_field(payload.title, FieldName::new("title"))?;
    Ok(RecipeDraft {
        fields: RecipeFields {
            title,
            description: payload.description,
            instructions: payload.instructions,
            prep_time: payload.prep_time,
            cook_time: payload.cook_time,
        },
        ingredients: payload
            .ingredients
            .into_iter()
            .map(|line| IngredientLine {
                name: line.name,
                quantity: line.quantity,
            })
            .collect(),
        tags: payload.tags.into_iter().map(|tag| tag.name).collect(),
    })
}
