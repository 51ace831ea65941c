//! HTTP integration tests.
//!
//! Drives the real router with `axum_test::TestServer`, cookies carried
//! between requests, walking the full anonymous → authenticated →
//! anonymous state machine over the wire.

use axum::http::{header, StatusCode};
use axum_test::TestServer;
use std::sync::Arc;

use jokebox::auth::{AuthService, SessionCodec};
use jokebox::db::Store;
use jokebox::{AppConfig, AppState};

async fn create_test_server() -> TestServer {
    let store = Arc::new(Store::new_memory().await.expect("in-memory store"));
    let codec =
        SessionCodec::new(&["api-test-secret-long-enough".to_string()]).expect("codec");
    let auth = Arc::new(AuthService::new(codec, store.clone()));

    let state = AppState {
        config: Arc::new(AppConfig::default()),
        store,
        auth,
    };

    let app = jokebox::api::create_router().with_state(state);

    TestServer::builder()
        .save_cookies()
        .build(app)
        .expect("test server")
}

/// Register a user through the public form and leave the session cookie in
/// the server's jar.
async fn register(server: &TestServer, username: &str, password: &str) {
    let response = server
        .post("/register")
        .form(&[
            ("username", username),
            ("password", password),
            ("redirectTo", "/jokes"),
        ])
        .await;

    response.assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_home_redirects_to_jokes() {
    let server = create_test_server().await;

    let response = server.get("/").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/jokes");
}

#[tokio::test]
async fn test_jokes_index_is_public() {
    let server = create_test_server().await;

    let response = server.get("/jokes").await;

    response.assert_status_ok();
    assert!(response.text().contains("No jokes to tell yet."));
}

#[tokio::test]
async fn test_protected_route_redirects_anonymous_to_login() {
    let server = create_test_server().await;

    let response = server.get("/jokes/new").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/login?redirectTo=%2Fjokes%2Fnew"
    );
}

#[tokio::test]
async fn test_register_sets_hardened_session_cookie() {
    let server = create_test_server().await;

    let response = server
        .post("/register")
        .form(&[
            ("username", "kody"),
            ("password", "twixrox"),
            ("redirectTo", "/jokes"),
        ])
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/jokes");

    let set_cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .expect("ascii");
    assert!(set_cookie.starts_with("jokebox_session="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));
}

#[tokio::test]
async fn test_register_then_access_protected_route() {
    let server = create_test_server().await;
    register(&server, "kody", "twixrox").await;

    let response = server.get("/jokes/new").await;

    response.assert_status_ok();
    assert!(response.text().contains("Add your own hilarious joke"));
}

#[tokio::test]
async fn test_register_duplicate_username_rerenders_form() {
    let server = create_test_server().await;
    register(&server, "kody", "twixrox").await;

    let response = server
        .post("/register")
        .form(&[
            ("username", "kody"),
            ("password", "different"),
            ("redirectTo", "/jokes"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response
        .text()
        .contains("User with username kody already exists"));
}

#[tokio::test]
async fn test_login_round_trip_honors_redirect_to() {
    let mut server = create_test_server().await;
    register(&server, "kody", "twixrox").await;

    // Drop authenticated state before logging back in.
    server.clear_cookies();

    let response = server
        .post("/login")
        .form(&[
            ("username", "kody"),
            ("password", "twixrox"),
            ("redirectTo", "/jokes/new"),
        ])
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/jokes/new");

    let protected = server.get("/jokes/new").await;
    protected.assert_status_ok();
}

#[tokio::test]
async fn test_login_failures_render_one_generic_message() {
    let mut server = create_test_server().await;
    register(&server, "real-user", "twixrox").await;
    server.clear_cookies();

    let unknown = server
        .post("/login")
        .form(&[
            ("username", "nonexistent-user"),
            ("password", "anything"),
            ("redirectTo", "/jokes"),
        ])
        .await;
    let wrong = server
        .post("/login")
        .form(&[
            ("username", "real-user"),
            ("password", "wrong-password"),
            ("redirectTo", "/jokes"),
        ])
        .await;

    unknown.assert_status(StatusCode::BAD_REQUEST);
    wrong.assert_status(StatusCode::BAD_REQUEST);
    assert!(unknown
        .text()
        .contains("Username/Password combination is incorrect"));
    assert_eq!(unknown.text(), wrong.text());
}

#[tokio::test]
async fn test_external_redirect_to_is_clamped() {
    let mut server = create_test_server().await;
    register(&server, "kody", "twixrox").await;
    server.clear_cookies();

    let response = server
        .post("/login")
        .form(&[
            ("username", "kody"),
            ("password", "twixrox"),
            ("redirectTo", "https://evil.example"),
        ])
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/jokes");
}

#[tokio::test]
async fn test_create_and_view_joke() {
    let server = create_test_server().await;
    register(&server, "kody", "twixrox").await;

    let created = server
        .post("/jokes")
        .form(&[
            ("name", "Road worker"),
            ("content", "I never wanted to believe that my Dad was stealing from his job as a road worker. But when I got home, all the signs were there."),
        ])
        .await;

    created.assert_status(StatusCode::FOUND);
    let location = created.headers()[header::LOCATION]
        .to_str()
        .expect("ascii")
        .to_string();
    assert!(location.starts_with("/jokes/"));

    let detail = server.get(&location).await;
    detail.assert_status_ok();
    assert!(detail.text().contains("all the signs were there"));

    let index = server.get("/jokes").await;
    index.assert_status_ok();
    assert!(index.text().contains("Road worker"));
}

#[tokio::test]
async fn test_joke_validation_rerenders_form() {
    let server = create_test_server().await;
    register(&server, "kody", "twixrox").await;

    let response = server
        .post("/jokes")
        .form(&[("name", "ha"), ("content", "This content is long enough.")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.text().contains("That joke's name is too short"));
}

#[tokio::test]
async fn test_unknown_joke_is_not_found() {
    let server = create_test_server().await;

    let response = server.get("/jokes/definitely-not-a-joke-id").await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_logout_post_destroys_session() {
    let server = create_test_server().await;
    register(&server, "kody", "twixrox").await;

    let response = server.post("/logout").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/login");
    let set_cookie = response.headers()[header::SET_COOKIE]
        .to_str()
        .expect("ascii");
    assert!(set_cookie.contains("Max-Age=0"));

    // The destroyed session no longer opens protected routes.
    let protected = server.get("/jokes/new").await;
    protected.assert_status(StatusCode::FOUND);
}

#[tokio::test]
async fn test_logout_get_leaves_session_alone() {
    let server = create_test_server().await;
    register(&server, "kody", "twixrox").await;

    let response = server.get("/logout").await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    // Still authenticated afterwards.
    let protected = server.get("/jokes/new").await;
    protected.assert_status_ok();
}

#[tokio::test]
async fn test_logout_twice_never_fails() {
    let server = create_test_server().await;
    register(&server, "kody", "twixrox").await;

    let first = server.post("/logout").await;
    let second = server.post("/logout").await;

    first.assert_status(StatusCode::FOUND);
    second.assert_status(StatusCode::FOUND);
    assert_eq!(first.headers()[header::LOCATION], "/login");
    assert_eq!(second.headers()[header::LOCATION], "/login");
}

#[tokio::test]
async fn test_tampered_cookie_falls_back_to_anonymous() {
    let mut server = create_test_server().await;
    register(&server, "kody", "twixrox").await;
    server.clear_cookies();

    let response = server
        .get("/jokes/new")
        .add_header(
            header::COOKIE,
            axum::http::HeaderValue::from_static("jokebox_session=bm90LWEtcmVhbC1zZXNzaW9u"),
        )
        .await;

    response.assert_status(StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "/login?redirectTo=%2Fjokes%2Fnew"
    );
}
