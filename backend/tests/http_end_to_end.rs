//! End-to-end HTTP flows over the real services and the in-memory store.

mod support;

use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, USER_AGENT};
use actix_web::{App, test, web};
use recipe_backend::Trace;
use recipe_backend::domain::TRACE_ID_HEADER;
use recipe_backend::inbound::http::configure;
use rstest::rstest;
use serde_json::{Value, json};
use support::Harness;

macro_rules! app {
    ($harness:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state.clone()))
                .wrap(Trace)
                .service(web::scope("/api/v1").configure(configure)),
        )
        .await
    };
}

macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let res = test::call_service(&$app, $req.to_request()).await;
        let status = res.status();
        let body: Value = test::read_body_json(res).await;
        (status, body)
    }};
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

#[rstest]
#[actix_rt::test]
async fn full_recipe_lifecycle() {
    let harness = Harness::new();
    let app = app!(harness);

    let (status, admin) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/register")
            .set_json(json!({ "username": "Chef", "password": "pw" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(admin["isAdmin"], true);
    assert_eq!(admin["username"], "chef");

    let (status, login) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({ "username": "chef", "password": "pw" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(login["tokenType"], "bearer");
    let token = login["accessToken"].as_str().expect("token").to_owned();

    for name in ["Egg", "basil"] {
        let (status, _) = call_json!(
            app,
            test::TestRequest::post()
                .uri("/api/v1/ingredients")
                .insert_header(bearer(&token))
                .set_json(json!({ "name": name }))
        );
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, recipe) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .insert_header(bearer(&token))
            .set_json(json!({
                "title": "Pesto eggs",
                "ingredients": [{ "name": "egg, basil", "quantity": "2 st" }],
                "tags": [{ "name": "Brunch" }]
            }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(recipe["createdByUsername"], "chef");
    assert_eq!(recipe["tags"][0]["name"], "brunch");
    let recipe_id = recipe["id"].as_i64().expect("id");

    let (status, found) = call_json!(
        app,
        test::TestRequest::get().uri("/api/v1/recipes/search?query=egg,%20basil&scope=ingredients")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let (status, comment) = call_json!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/recipes/{recipe_id}/comments"))
            .insert_header(bearer(&token))
            .set_json(json!({ "content": "Delicious" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    let comment_id = comment["id"].as_i64().expect("comment id");

    let (status, liked) = call_json!(
        app,
        test::TestRequest::post()
            .uri(&format!(
                "/api/v1/recipes/{recipe_id}/comments/{comment_id}/like"
            ))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(liked["liked"], true);

    let (status, favorite) = call_json!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/recipes/{recipe_id}/favorite"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(favorite["favorited"], true);

    let (status, detail) = call_json!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/recipes/{recipe_id}"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["favoriteCount"], 1);
    assert_eq!(detail["comments"][0]["likeCount"], 1);

    let (status, _) = call_json!(
        app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/recipes/{recipe_id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(harness.store.comment_rows(), 0);
    assert_eq!(harness.store.like_rows(), 0);
    assert_eq!(harness.store.favorite_rows(), 0);

    let (status, body) = call_json!(
        app,
        test::TestRequest::get().uri(&format!("/api/v1/recipes/{recipe_id}"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_rt::test]
async fn writes_without_a_token_are_unauthorised_and_traced() {
    let harness = Harness::new();
    let app = app!(harness);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/recipes")
            .set_json(json!({ "title": "Toast" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(body["traceId"], header.as_str());
}

#[rstest]
#[actix_rt::test]
async fn presence_counts_browsers_not_tabs() {
    let harness = Harness::new();
    let app = app!(harness);

    for device in ["tab-1", "tab-2"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/presence/heartbeat")
                .insert_header((USER_AGENT, "Firefox/130"))
                .set_json(json!({ "deviceId": device }))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    let (status, count) = call_json!(app, test::TestRequest::get().uri("/api/v1/presence/online"));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(count["online"], 2, "anonymous tabs count per device");
    assert_eq!(count["windowSeconds"], 120);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/presence/offline")
            .set_json(json!({ "deviceId": "tab-1" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, count) = call_json!(app, test::TestRequest::get().uri("/api/v1/presence/online"));
    assert_eq!(count["online"], 1);
}

#[rstest]
#[actix_rt::test]
async fn blank_device_ids_are_rejected() {
    let harness = Harness::new();
    let app = app!(harness);

    let (status, body) = call_json!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/presence/heartbeat")
            .set_json(json!({ "deviceId": "   " }))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}
