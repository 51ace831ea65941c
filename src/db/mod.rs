//! Database layer.
//!
//! A single embedded libsql/SQLite database holds user and joke records.
//! Schema is created on startup; the auth core treats this module as an
//! opaque store keyed by id and username.

pub mod store;

pub use store::{Joke, Store, User};
