//! Authentication: password hashing, the cookie-session codec, and the
//! service tying them to the store.
//!
//! # Security properties
//!
//! - **Password hashing**: Argon2id with per-password random salts.
//! - **Sessions**: client-held cookies sealed with AES-256-GCM; the server
//!   keeps no session state and only verifies with its configured secrets.
//! - **Fail-open-to-anonymous**: any unreadable session is an empty one.
//! - **Anti-enumeration**: failed logins never reveal whether the username
//!   exists.

/// Argon2id password hashing and verification.
pub mod password;
/// Session service orchestration (register, login, identity, logout).
pub mod service;
/// Encrypted cookie-session codec.
pub mod session;

pub use service::{redirect, AuthService, Identity};
pub use session::{SessionCodec, SESSION_COOKIE_NAME};
