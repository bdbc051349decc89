//! Test helpers for inbound HTTP components.

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, web};
use serde_json::Value;

use crate::domain::ports::FixtureAccountService;
use crate::domain::test_fixtures::fixture_timestamp;
use crate::domain::{
    Comment, CommentId, IngredientId, IngredientMeasurement, IngredientSummary, RecipeFields,
    RecipeId, RecipeView, Tag, TagId, User, UserId, Username,
};
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;

/// Build an app serving every API route under `/api/v1` with `state`.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure))
}

/// `Authorization` header accepted by [`FixtureAccountService`].
pub fn admin_auth() -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {}", FixtureAccountService::TOKEN))
}

/// Build a domain user for expectations.
pub fn user(id: i32, name: &str, is_admin: bool) -> User {
    User {
        id: UserId::new(id),
        username: Username::new(name).expect("valid username"),
        is_admin,
    }
}

/// Read a string field out of a JSON error payload.
pub fn error_code(body: &Value) -> Option<&str> {
    body.get("code").and_then(Value::as_str)
}

/// Decorated recipe with one ingredient, one tag and one comment.
pub fn sample_recipe(id: i32) -> RecipeView {
    let created_at = fixture_timestamp();
    RecipeView {
        id: RecipeId::new(id),
        fields: RecipeFields {
            title: "Shakshuka".to_owned(),
            description: Some("Eggs in tomato sauce".to_owned()),
            instructions: None,
            prep_time: Some(10),
            cook_time: Some(20),
        },
        created_at,
        created_by_username: Some("admin".to_owned()),
        favorite_count: 2,
        ingredients: vec![IngredientSummary {
            id: IngredientId::new(7),
            name: "egg".to_owned(),
        }],
        ingredient_measurements: vec![IngredientMeasurement {
            ingredient_id: IngredientId::new(7),
            name: "egg".to_owned(),
            quantity: Some("4 st".to_owned()),
        }],
        tags: vec![Tag {
            id: TagId::new(3),
            name: "breakfast".to_owned(),
        }],
        comments: vec![sample_comment(id, 11)],
    }
}

/// Decorated comment on `recipe_id`.
pub fn sample_comment(recipe_id: i32, id: i32) -> Comment {
    Comment {
        id: CommentId::new(id),
        recipe_id: RecipeId::new(recipe_id),
        content: "Lovely".to_owned(),
        created_at: fixture_timestamp(),
        created_by_username: Some("ada".to_owned()),
        like_count: 1,
    }
}
