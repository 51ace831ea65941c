//! Joke browsing and creation handlers.

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::pages;
use crate::auth::{redirect, Identity};
use crate::types::{AppError, Result};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NewJokeForm {
    pub name: String,
    pub content: String,
}

fn validate_joke(name: &str, content: &str) -> Option<&'static str> {
    if name.len() < 3 {
        return Some("That joke's name is too short");
    }
    if content.len() < 10 {
        return Some("That joke is too short");
    }
    None
}

/// GET /: everything lives under /jokes.
pub async fn home() -> Response {
    redirect("/jokes")
}

/// GET /jokes: a random joke plus the list of joke names.
pub async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let user = state.auth.current_user(&headers).await?;
    let random = state.store.random_joke().await?;
    let jokes = state.store.list_jokes().await?;

    let username = user.as_ref().map(|u| u.username.as_str());
    Ok(Html(pages::jokes_page(username, random.as_ref(), &jokes)).into_response())
}

/// GET /jokes/{joke_id}: a single joke, or a typed not-found error.
pub async fn detail(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(joke_id): Path<String>,
) -> Result<Response> {
    let user = state.auth.current_user(&headers).await?;

    let joke = state
        .store
        .get_joke(&joke_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("What a joke! {} not found", joke_id)))?;

    let username = user.as_ref().map(|u| u.username.as_str());
    Ok(Html(pages::joke_page(username, &joke)).into_response())
}

/// GET /jokes/new: the creation form. Protected.
pub async fn new_joke(State(state): State<AppState>, headers: HeaderMap) -> Result<Response> {
    let user_id = match state.auth.require_user_id(&headers, "/jokes/new") {
        Identity::User(id) => id,
        Identity::Redirect(location) => return Ok(redirect(&location)),
    };

    let user = state.store.get_user_by_id(&user_id).await?;
    let username = user.as_ref().map(|u| u.username.as_str());
    Ok(Html(pages::new_joke_page(username, None)).into_response())
}

/// POST /jokes: create a joke. Protected.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<NewJokeForm>,
) -> Result<Response> {
    let user_id = match state.auth.require_user_id(&headers, "/jokes/new") {
        Identity::User(id) => id,
        Identity::Redirect(location) => return Ok(redirect(&location)),
    };

    if let Some(message) = validate_joke(&form.name, &form.content) {
        let user = state.store.get_user_by_id(&user_id).await?;
        let username = user.as_ref().map(|u| u.username.as_str());
        return Ok((
            axum::http::StatusCode::BAD_REQUEST,
            Html(pages::new_joke_page(username, Some(message))),
        )
            .into_response());
    }

    let joke_id = Uuid::new_v4().to_string();
    state
        .store
        .create_joke(&joke_id, &form.name, &form.content, &user_id)
        .await?;

    Ok(redirect(&format!("/jokes/{}", joke_id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ha", "long enough content here", Some("That joke's name is too short"))]
    #[case("fine name", "too short", Some("That joke is too short"))]
    #[case("fine name", "long enough content here", None)]
    fn test_validate_joke(
        #[case] name: &str,
        #[case] content: &str,
        #[case] expected: Option<&str>,
    ) {
        assert_eq!(validate_joke(name, content), expected);
    }
}
