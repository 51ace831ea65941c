//! HTTP request handlers.

/// Authentication handlers (login, register, logout).
pub mod auth;
/// Joke browsing and creation handlers.
pub mod jokes;
