//! Route table.

use axum::routing::get;
use axum::Router;

use crate::AppState;

/// Build the application router.
///
/// There is no auth middleware layer: protected handlers call
/// `require_user_id` and branch on the result explicitly, so the
/// login-redirect control flow is visible at each call site.
pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(crate::api::handlers::jokes::home))
        .route(
            "/jokes",
            get(crate::api::handlers::jokes::index).post(crate::api::handlers::jokes::create),
        )
        .route("/jokes/new", get(crate::api::handlers::jokes::new_joke))
        .route("/jokes/{joke_id}", get(crate::api::handlers::jokes::detail))
        .route(
            "/login",
            get(crate::api::handlers::auth::login_page).post(crate::api::handlers::auth::login),
        )
        .route(
            "/register",
            get(crate::api::handlers::auth::register_page)
                .post(crate::api::handlers::auth::register),
        )
        .route(
            "/logout",
            get(crate::api::handlers::auth::logout_redirect)
                .post(crate::api::handlers::auth::logout),
        )
}
