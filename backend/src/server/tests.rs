//! Tests for server construction, covering readiness signalling and the
//! assembled application.

use super::*;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use recipe_backend::domain::TRACE_ID_HEADER;
use rstest::{fixture, rstest};

#[fixture]
fn health_state() -> web::Data<HealthState> {
    web::Data::new(HealthState::new())
}

fn app_dependencies(health_state: web::Data<HealthState>) -> AppDependencies {
    AppDependencies {
        health_state,
        http_state: web::Data::new(HttpState::default()),
        cors_origins: vec!["http://localhost:5173".to_owned()],
    }
}

#[rstest]
#[actix_rt::test]
async fn create_server_marks_ready(health_state: web::Data<HealthState>) {
    assert!(!health_state.is_ready(), "state should start unready");

    let config = ServerConfig::new("127.0.0.1:0".parse().expect("socket address"));
    assert_eq!(config.bind_addr().port(), 0);
    let _server = create_server(health_state.clone(), config).expect("server should build");

    assert!(
        health_state.is_ready(),
        "server creation should mark readiness"
    );
}

#[rstest]
#[actix_rt::test]
async fn assembled_app_serves_banner_probes_and_api(health_state: web::Data<HealthState>) {
    health_state.mark_ready();
    let app = actix_test::init_service(build_app(app_dependencies(health_state))).await;

    for uri in ["/", "/health/ready", "/health/live", "/api/v1/presence/online"] {
        let res =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        assert_eq!(res.status(), StatusCode::OK, "{uri}");
        assert!(res.headers().contains_key(TRACE_ID_HEADER), "{uri}");
    }
}

#[rstest]
#[actix_rt::test]
async fn cors_allows_configured_origins_only(health_state: web::Data<HealthState>) {
    let app = actix_test::init_service(build_app(app_dependencies(health_state))).await;

    let allowed = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/tags")
            .insert_header((header::ORIGIN, "http://localhost:5173"))
            .to_request(),
    )
    .await;
    assert_eq!(
        allowed
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:5173")
    );

    let denied = actix_test::TestRequest::get()
        .uri("/api/v1/tags")
        .insert_header((header::ORIGIN, "https://evil.example"))
        .to_request();
    let denied = actix_test::try_call_service(&app, denied).await;
    let allowed_origin = denied
        .ok()
        .and_then(|res| res.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).cloned());
    assert!(allowed_origin.is_none());
}
