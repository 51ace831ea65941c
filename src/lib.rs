//! # Jokebox
//!
//! A small server-rendered web application: user registration, login and
//! logout, and CRUD display of joke records. The engineering core is
//! session-based authentication: an encrypted, tamper-evident cookie
//! carrying the user id, validated on every request, with unauthenticated
//! visitors bounced to a login flow that remembers where they came from.
//!
//! ## Overview
//!
//! Jokebox can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `jokebox-server` binary
//! 2. **As a library** - Import the auth/session components into your own
//!    Rust project
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use jokebox::auth::{AuthService, SessionCodec};
//! use jokebox::db::Store;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(Store::new_local("./data/jokebox.db").await?);
//!     let codec = SessionCodec::new(&["my-session-secret".to_string()])?;
//!     let auth = AuthService::new(codec, store.clone());
//!
//!     let user = auth.register("kody", "twixrox").await?;
//!     println!("registered {}", user.username);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`api`] - Routes, handlers, and server-rendered pages
//! - [`auth`] - Password hashing, session codec, auth service
//! - [`db`] - Embedded libsql store for users and jokes
//! - [`types`] - Common types and error handling
//! - [`utils`] - Configuration
//!
//! ## Session model
//!
//! Sessions live entirely on the client as one encrypted cookie; the
//! server is stateless between requests and holds only the secrets. The
//! first configured secret seals new sessions, every configured secret is
//! tried when opening existing ones, so secrets rotate with zero downtime.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Routes, handlers, and server-rendered pages.
pub mod api;
/// Password hashing, session codec, and the auth service.
pub mod auth;
/// Embedded libsql store.
pub mod db;
/// Core types (records, errors).
pub mod types;
/// Configuration utilities.
pub mod utils;

// Re-export commonly used types
pub use auth::{AuthService, Identity, SessionCodec};
pub use db::{Joke, Store, User};
pub use types::{AppError, Result};
pub use utils::AppConfig;

use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<AppConfig>,
    /// Database store
    pub store: Arc<Store>,
    /// Authentication service
    pub auth: Arc<AuthService>,
}
