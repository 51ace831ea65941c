//! Authentication handlers: login, registration, logout.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use tracing::info;

use crate::api::pages;
use crate::auth::redirect;
use crate::types::{AppError, Result};
use crate::AppState;

/// Default landing page after authentication.
const DEFAULT_REDIRECT: &str = "/jokes";

#[derive(Debug, Deserialize)]
pub struct RedirectQuery {
    #[serde(rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
    #[serde(rename = "redirectTo", default)]
    pub redirect_to: Option<String>,
}

/// Clamp the return path to a same-site absolute path.
fn sanitize_redirect(redirect_to: Option<&str>) -> &str {
    match redirect_to {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path,
        _ => DEFAULT_REDIRECT,
    }
}

fn validate_credentials(username: &str, password: &str) -> Option<&'static str> {
    if username.len() < 3 {
        return Some("Usernames must be at least 3 characters long");
    }
    if password.len() < 6 {
        return Some("Passwords must be at least 6 characters long");
    }
    None
}

/// Render the login form.
pub async fn login_page(Query(query): Query<RedirectQuery>) -> Html<String> {
    let redirect_to = sanitize_redirect(query.redirect_to.as_deref());
    Html(pages::login_page(redirect_to, None))
}

/// Process a login form submission.
///
/// Unknown usernames and wrong passwords produce the same response; the
/// form never reveals which one it was.
pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let redirect_to = sanitize_redirect(form.redirect_to.as_deref()).to_string();

    if let Some(message) = validate_credentials(&form.username, &form.password) {
        return Ok((
            StatusCode::BAD_REQUEST,
            Html(pages::login_page(&redirect_to, Some(message))),
        )
            .into_response());
    }

    let Some(user) = state.auth.login(&form.username, &form.password).await? else {
        return Ok((
            StatusCode::BAD_REQUEST,
            Html(pages::login_page(
                &redirect_to,
                Some("Username/Password combination is incorrect"),
            )),
        )
            .into_response());
    };

    info!(username = %user.username, "user logged in");
    state.auth.create_user_session(&user.id, &redirect_to)
}

/// Render the registration form.
pub async fn register_page(Query(query): Query<RedirectQuery>) -> Html<String> {
    let redirect_to = sanitize_redirect(query.redirect_to.as_deref());
    Html(pages::register_page(redirect_to, None))
}

/// Process a registration form submission and log the new user in.
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> Result<Response> {
    let redirect_to = sanitize_redirect(form.redirect_to.as_deref()).to_string();

    if let Some(message) = validate_credentials(&form.username, &form.password) {
        return Ok((
            StatusCode::BAD_REQUEST,
            Html(pages::register_page(&redirect_to, Some(message))),
        )
            .into_response());
    }

    let user = match state.auth.register(&form.username, &form.password).await {
        Ok(user) => user,
        Err(AppError::Conflict(_)) => {
            return Ok((
                StatusCode::BAD_REQUEST,
                Html(pages::register_page(
                    &redirect_to,
                    Some(&format!(
                        "User with username {} already exists",
                        form.username
                    )),
                )),
            )
                .into_response());
        }
        Err(e) => return Err(e),
    };

    info!(username = %user.username, "user registered");
    state.auth.create_user_session(&user.id, &redirect_to)
}

/// POST /logout: destroy the session and bounce to the login page.
pub async fn logout(State(state): State<AppState>) -> Response {
    state.auth.logout()
}

/// GET /logout: plain navigation never destroys the session.
pub async fn logout_redirect() -> Response {
    redirect("/")
}
