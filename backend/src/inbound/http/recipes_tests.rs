//! Tests for recipe HTTP handlers.

use super::*;
use crate::domain::ports::{MockRecipeCommand, MockRecipeQuery};
use crate::domain::{Error, SearchScope};
use crate::inbound::http::test_utils::{admin_auth, error_code, sample_recipe, test_app};
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};
use std::sync::Arc;

fn query_state(query: MockRecipeQuery) -> HttpState {
    HttpState {
        recipes_query: Arc::new(query),
        ..HttpState::default()
    }
}

fn command_state(command: MockRecipeCommand) -> HttpState {
    HttpState {
        recipes: Arc::new(command),
        ..HttpState::default()
    }
}

#[actix_web::test]
async fn list_returns_decorated_recipes_in_camel_case() {
    let mut query = MockRecipeQuery::new();
    query
        .expect_list()
        .withf(|recipe_search| recipe_search.is_unfiltered())
        .times(1)
        .return_once(|_| Ok(vec![sample_recipe(5)]));
    let app = actix_test::init_service(test_app(query_state(query))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/recipes").to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    let first = &body.as_array().expect("array")[0];
    assert_eq!(first.get("id").and_then(Value::as_i64), Some(5));
    assert_eq!(first.get("favoriteCount").and_then(Value::as_i64), Some(2));
    assert_eq!(
        first.get("createdByUsername").and_then(Value::as_str),
        Some("admin")
    );
    assert_eq!(
        first.pointer("/ingredientMeasurements/0"),
        Some(&json!({"ingredientId": 7, "name": "egg", "quantity": "4 st"}))
    );
    assert_eq!(
        first.pointer("/comments/0/likeCount").and_then(Value::as_i64),
        Some(1)
    );
    assert!(first.get("favorite_count").is_none());
}

#[actix_web::test]
async fn list_forwards_terms_and_scope() {
    let mut query = MockRecipeQuery::new();
    query
        .expect_list()
        .withf(|recipe_search| recipe_search.terms() == ["egg", "basil"] && recipe_search.scope() == SearchScope::All)
        .times(1)
        .return_once(|_| Ok(Vec::new()));
    let app = actix_test::init_service(test_app(query_state(query))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes?query=egg,%20Basil&scope=%20ALL%20")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case("/api/v1/recipes?query=egg&scope=bogus")]
#[case("/api/v1/recipes/search?query=egg&scope=title")]
#[case("/api/v1/recipes/search")]
#[actix_web::test]
async fn bad_search_parameters_are_rejected(#[case] uri: &str) {
    let mut query = MockRecipeQuery::new();
    query.expect_list().times(0);
    query.expect_get().times(0);
    let app = actix_test::init_service(test_app(query_state(query))).await;

    let res =
        actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request()).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(error_code(&body), Some("invalid_request"));
}

#[actix_web::test]
async fn search_route_is_not_shadowed_by_recipe_lookup() {
    let mut query = MockRecipeQuery::new();
    query
        .expect_list()
        .withf(|recipe_search| recipe_search.scope() == SearchScope::Tags)
        .times(1)
        .return_once(|_| Ok(vec![sample_recipe(1)]));
    query.expect_get().times(0);
    let app = actix_test::init_service(test_app(query_state(query))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes/search?query=breakfast&scope=tags")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn missing_recipes_are_not_found() {
    let app = actix_test::init_service(test_app(HttpState::default())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes/42")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn create_requires_a_token() {
    let mut command = MockRecipeCommand::new();
    command.expect_create().times(0);
    let app = actix_test::init_service(test_app(command_state(command))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .set_json(json!({"title": "Soup"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn create_passes_the_raw_draft_to_the_domain() {
    let mut command = MockRecipeCommand::new();
    command
        .expect_create()
        .withf(|actor, draft| {
            actor.is_admin
                && draft.fields.title == "Shakshuka"
                && draft.ingredients.len() == 1
                && draft.ingredients[0].name == "Egg; tomato"
                && draft.ingredients[0].quantity.as_deref() == Some("4st")
                && draft.tags == ["Breakfast"]
        })
        .times(1)
        .return_once(|_, _| Ok(sample_recipe(9)));
    let app = actix_test::init_service(test_app(command_state(command))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .insert_header(admin_auth())
            .set_json(json!({
                "title": "Shakshuka",
                "prepTime": 10,
                "ingredients": [{"name": "Egg; tomato", "quantity": "4st"}],
                "tags": [{"name": "Breakfast"}],
            }))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: RecipeResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.id, 9);
}

#[actix_web::test]
async fn create_without_title_is_a_validation_error() {
    let mut command = MockRecipeCommand::new();
    command.expect_create().times(0);
    let app = actix_test::init_service(test_app(command_state(command))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/recipes")
            .insert_header(admin_auth())
            .set_json(json!({"ingredients": []}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body.pointer("/details/field").and_then(Value::as_str),
        Some("title")
    );
}

#[actix_web::test]
async fn domain_validation_messages_reach_the_client() {
    let mut command = MockRecipeCommand::new();
    command.expect_update().return_once(|_, _, _| {
        Err(Error::invalid_request(
            "Unknown ingredients: basil, saffron. Add them to the catalogue first.",
        ))
    });
    let app = actix_test::init_service(test_app(command_state(command))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri("/api/v1/recipes/3")
            .insert_header(admin_auth())
            .set_json(json!({"title": "Pesto", "ingredients": [{"name": "basil, saffron"}]}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Unknown ingredients: basil, saffron. Add them to the catalogue first.")
    );
}

#[actix_web::test]
async fn delete_returns_the_removed_recipe() {
    let mut command = MockRecipeCommand::new();
    command
        .expect_delete()
        .withf(|_, id| *id == RecipeId::new(4))
        .return_once(|_, _| Ok(sample_recipe(4)));
    let app = actix_test::init_service(test_app(command_state(command))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/recipes/4")
            .insert_header(admin_auth())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: RecipeResponse = actix_test::read_body_json(res).await;
    assert_eq!(body.title, "Shakshuka");
}

#[actix_web::test]
async fn forbidden_deletes_surface_as_403() {
    let mut command = MockRecipeCommand::new();
    command
        .expect_delete()
        .return_once(|_, _| Err(Error::forbidden("Only the author or an admin may do that")));
    let app = actix_test::init_service(test_app(command_state(command))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/recipes/4")
            .insert_header(admin_auth())
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::FORBIDDEN);
}
