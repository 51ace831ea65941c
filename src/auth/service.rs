//! Session-based authentication service.
//!
//! Composes the session codec, password hashing, and the store into the
//! operations the route handlers call: register, login, session creation,
//! identity lookup and enforcement, and logout.

use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::password;
use crate::auth::session::SessionCodec;
use crate::db::{Store, User};
use crate::types::{AppError, Result};

/// Session key carrying the authenticated user id.
const SESSION_USER_ID_KEY: &str = "userId";

/// Outcome of an identity requirement check.
///
/// Protected handlers branch on this explicitly instead of relying on
/// thrown control flow: either the request carries a client-asserted
/// identity, or the caller must return the login redirect.
#[derive(Debug)]
pub enum Identity {
    /// A `userId` was present in the session.
    User(String),
    /// No identity; redirect to the login page with a return path.
    Redirect(String),
}

/// Orchestrates registration, login, and cookie-session handling.
pub struct AuthService {
    codec: SessionCodec,
    store: Arc<Store>,
}

impl AuthService {
    /// Creates a service over an already-validated codec and store.
    pub fn new(codec: SessionCodec, store: Arc<Store>) -> Self {
        Self { codec, store }
    }

    /// Register a new user with a freshly hashed password.
    ///
    /// A duplicate username surfaces as [`AppError::Conflict`]; the store's
    /// UNIQUE constraint is authoritative, no pre-check read is made.
    pub async fn register(&self, username: &str, password: &str) -> Result<User> {
        let password_hash = password::hash_password(password)?;
        let id = Uuid::new_v4().to_string();

        self.store.create_user(&id, username, &password_hash).await?;

        self.store
            .get_user_by_id(&id)
            .await?
            .ok_or_else(|| AppError::Internal("Registered user vanished".to_string()))
    }

    /// Look up a user by username and verify the password.
    ///
    /// Unknown username and wrong password both return `Ok(None)`; callers
    /// cannot distinguish the two (anti-enumeration).
    pub async fn login(&self, username: &str, password: &str) -> Result<Option<User>> {
        let Some(user) = self.store.get_user_by_username(username).await? else {
            return Ok(None);
        };

        if !password::verify_password(password, &user.password_hash)? {
            return Ok(None);
        }

        Ok(Some(user))
    }

    /// Establish authenticated state: a redirect response carrying a
    /// freshly sealed session cookie. This is the only path that sets one.
    pub fn create_user_session(&self, user_id: &str, redirect_to: &str) -> Result<Response> {
        let mut session = HashMap::new();
        session.insert(SESSION_USER_ID_KEY.to_string(), user_id.to_string());

        let encoded = self.codec.encode(&session)?;
        let cookie = self.codec.set_cookie_header(&encoded)?;

        Ok(redirect_with_cookie(redirect_to, cookie))
    }

    /// The client-asserted identity, if any.
    ///
    /// This is the single source of truth for "is there a session user id";
    /// it does not guarantee the id still resolves to a stored user.
    pub fn user_id(&self, headers: &HeaderMap) -> Option<String> {
        let cookie_header = headers.get(header::COOKIE).and_then(|v| v.to_str().ok());
        let session = self.codec.decode(cookie_header);
        session.get(SESSION_USER_ID_KEY).cloned()
    }

    /// Require an identity, or produce the login redirect for the caller
    /// to return. `redirect_to` is the path to come back to after login.
    pub fn require_user_id(&self, headers: &HeaderMap, redirect_to: &str) -> Identity {
        match self.user_id(headers) {
            Some(id) => Identity::User(id),
            None => Identity::Redirect(format!(
                "/login?redirectTo={}",
                urlencoding::encode(redirect_to)
            )),
        }
    }

    /// Resolve the session identity to a stored user.
    ///
    /// A session carrying an id for a user that no longer exists returns
    /// `Ok(None)`: stale sessions are tolerated, not errors.
    pub async fn current_user(&self, headers: &HeaderMap) -> Result<Option<User>> {
        let Some(id) = self.user_id(headers) else {
            return Ok(None);
        };

        self.store.get_user_by_id(&id).await
    }

    /// Destroy the session: redirect to the login page with a cookie that
    /// instructs the client to discard it. Idempotent and infallible.
    pub fn logout(&self) -> Response {
        redirect_with_cookie("/login", self.codec.clear_cookie_header())
    }
}

/// A literal 302 redirect. `axum::response::Redirect` emits 303 for
/// `to`, so the status is set directly.
pub fn redirect(location: &str) -> Response {
    (
        StatusCode::FOUND,
        [(header::LOCATION, location.to_string())],
    )
        .into_response()
}

fn redirect_with_cookie(location: &str, cookie: HeaderValue) -> Response {
    let mut response = redirect(location);
    response.headers_mut().insert(header::SET_COOKIE, cookie);
    response
}
