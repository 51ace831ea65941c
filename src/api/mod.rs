//! HTTP API: routes, handlers, and page rendering.

/// Request handlers organized by functionality.
pub mod handlers;
/// Server-rendered HTML pages.
pub mod pages;
/// Router construction.
pub mod routes;

pub use routes::create_router;
