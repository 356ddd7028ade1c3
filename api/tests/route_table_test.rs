//! Route table smoke tests: registered paths answer with the right
//! method constraints without touching any backing service.

use actix_web::http::StatusCode;
use actix_web::{test, App};

use sp_api::routes;

#[actix_web::test]
async fn test_registered_paths_constrain_methods() {
    let app = test::init_service(App::new().configure(routes::configure)).await;

    // A wrong method on a known path answers 405, proving the route is
    // registered where the clients expect it.
    for path in [
        "/api/session/public/in",
        "/api/session/public/refresh",
        "/api/session/public/in/auth/phone",
        "/api/session/public/in/auth/email",
        "/api/session/private/out",
        "/api/session/private/out/auth",
        "/api/account/public/signup/token",
        "/api/account/public/signup",
        "/api/account/public/password/token/phone",
        "/api/account/public/password/token/email",
        "/api/account/private/password/confirm",
    ] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED, "{path}");
    }

    let req = test::TestRequest::post()
        .uri("/api/account/public/password")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);

    let req = test::TestRequest::get().uri("/api/account/private").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[actix_web::test]
async fn test_unknown_paths_are_not_found() {
    let app = test::init_service(App::new().configure(routes::configure)).await;

    for path in ["/api/session/public/nope", "/api/nope", "/nope"] {
        let req = test::TestRequest::post().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
    }
}
