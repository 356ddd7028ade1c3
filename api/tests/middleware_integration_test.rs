//! Integration tests for the security, rate limit and session guard
//! middleware, exercised through a real actix app.

use actix_web::http::StatusCode;
use actix_web::{test, web, App, HttpResponse};

use sp_api::middleware::{RequestRateLimit, SecurityMiddleware, SessionContext};
use sp_shared::Environment;

async fn probe() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({"ok": true}))
}

async fn whoami(_ctx: SessionContext) -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[actix_web::test]
async fn test_production_policy_stamps_security_headers() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityMiddleware::for_environment(Environment::Production))
            .route("/probe", web::get().to(probe)),
    )
    .await;

    // Test requests resolve to localhost, which passes HTTPS enforcement.
    let req = test::TestRequest::get().uri("/probe").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert_eq!(headers.get("cache-control").unwrap(), "no-store");
    assert!(headers.contains_key("strict-transport-security"));
    assert!(headers.contains_key("content-security-policy"));
}

#[actix_web::test]
async fn test_development_policy_leaves_responses_alone() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityMiddleware::for_environment(Environment::Development))
            .route("/probe", web::get().to(probe)),
    )
    .await;

    let req = test::TestRequest::get().uri("/probe").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(!resp.headers().contains_key("strict-transport-security"));
}

#[actix_web::test]
async fn test_plain_http_is_refused_for_real_hosts() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityMiddleware::for_environment(Environment::Production))
            .route("/probe", web::get().to(probe)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/probe")
        .insert_header(("host", "api.spotless.example"))
        .to_request();
    let err = test::try_call_service(&app, req).await.unwrap_err();
    assert_eq!(err.as_response_error().status_code(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_forwarded_https_passes_enforcement() {
    let app = test::init_service(
        App::new()
            .wrap(SecurityMiddleware::for_environment(Environment::Production))
            .route("/probe", web::get().to(probe)),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/probe")
        .insert_header(("host", "api.spotless.example"))
        .insert_header(("x-forwarded-proto", "https"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_session_context_requires_the_guard() {
    // Without the guard nothing populates the request extensions, so the
    // extractor has to refuse rather than hand out an empty session.
    let app = test::init_service(App::new().route("/private/probe", web::get().to(whoami))).await;

    let req = test::TestRequest::get().uri("/private/probe").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "AUTH_INVALID_REQUEST");
}

#[actix_web::test]
async fn test_rate_limit_is_inert_without_shared_state() {
    let app = test::init_service(
        App::new()
            .wrap(RequestRateLimit)
            .route("/probe", web::get().to(probe)),
    )
    .await;

    let req = test::TestRequest::get().uri("/probe").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
