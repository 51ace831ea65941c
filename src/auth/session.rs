//! Encrypted cookie-session codec.
//!
//! The session is a small string-to-string mapping that lives entirely on
//! the client as a single cookie. The server holds only the secrets needed
//! to seal and open it: the payload is JSON encrypted with AES-256-GCM
//! (random 96-bit nonce, `nonce || ciphertext`, base64 URL-safe without
//! padding). Decryption failure of any kind yields an empty session rather
//! than an error, so callers always receive a usable mapping.
//!
//! Multiple secrets enable zero-downtime rotation: the first secret seals
//! new sessions, every secret is tried when opening existing ones.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use axum::http::header::InvalidHeaderValue;
use axum::http::HeaderValue;
use base64::Engine;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::types::{AppError, Result};

/// Cookie name distinguishing this app's session from other cookies.
pub const SESSION_COOKIE_NAME: &str = "jokebox_session";

/// Session lifetime: 7 days.
pub const SESSION_MAX_AGE_SECS: u64 = 60 * 60 * 24 * 7;

/// Nonce size for AES-256-GCM (12 bytes / 96 bits).
const NONCE_SIZE: usize = 12;

/// Seals and opens the session cookie payload.
pub struct SessionCodec {
    /// Derived keys in rotation order; `keys[0]` seals new sessions.
    keys: Vec<[u8; 32]>,
}

impl SessionCodec {
    /// Creates a codec from the configured secrets, in rotation order.
    ///
    /// At least one non-empty secret is required; this is checked here so a
    /// misconfigured process fails at startup, not on the first request.
    pub fn new(secrets: &[String]) -> Result<Self> {
        let keys: Vec<[u8; 32]> = secrets
            .iter()
            .filter(|s| !s.is_empty())
            .map(|s| derive_key(s))
            .collect();

        if keys.is_empty() {
            return Err(AppError::Config(
                "Session codec requires at least one non-empty secret".to_string(),
            ));
        }

        Ok(Self { keys })
    }

    /// Encrypt a session mapping into a cookie-safe string.
    pub fn encode(&self, session: &HashMap<String, String>) -> Result<String> {
        let plaintext = serde_json::to_vec(session)
            .map_err(|e| AppError::Internal(format!("Failed to serialize session: {}", e)))?;

        let cipher = Aes256Gcm::new_from_slice(&self.keys[0])
            .map_err(|e| AppError::Internal(format!("Session cipher init failed: {}", e)))?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_slice())
            .map_err(|e| AppError::Internal(format!("Session encryption failed: {}", e)))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce);
        combined.extend_from_slice(&ciphertext);

        Ok(base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(&combined))
    }

    /// Decrypt the session carried by a `Cookie` request header.
    ///
    /// Returns an empty mapping when the header is absent, this app's
    /// cookie is missing, the value fails to verify under every configured
    /// secret, or the payload is malformed. Failures are swallowed by
    /// policy: downstream code depends on always getting a mapping back.
    pub fn decode(&self, cookie_header: Option<&str>) -> HashMap<String, String> {
        let Some(value) = cookie_header.and_then(extract_cookie_value) else {
            return HashMap::new();
        };

        self.open(value).unwrap_or_default()
    }

    /// Build the `Set-Cookie` header value committing an encoded session.
    pub fn set_cookie_header(&self, encoded: &str) -> Result<HeaderValue> {
        session_cookie(encoded, SESSION_MAX_AGE_SECS)
            .map_err(|e| AppError::Internal(format!("Invalid session cookie: {}", e)))
    }

    /// Build the `Set-Cookie` header value instructing the client to
    /// discard the session.
    pub fn clear_cookie_header(&self) -> HeaderValue {
        HeaderValue::from_static(
            "jokebox_session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0; Secure",
        )
    }

    fn open(&self, encoded: &str) -> Option<HashMap<String, String>> {
        let combined = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(encoded)
            .ok()?;

        if combined.len() < NONCE_SIZE {
            return None;
        }

        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        for key in &self.keys {
            let cipher = Aes256Gcm::new_from_slice(key).ok()?;
            if let Ok(plaintext) = cipher.decrypt(nonce, ciphertext) {
                return parse_session(&plaintext);
            }
        }

        None
    }
}

/// Derive a 256-bit cipher key from a configured secret.
fn derive_key(secret: &str) -> [u8; 32] {
    Sha256::digest(secret.as_bytes()).into()
}

/// Parse a decrypted payload, keeping only string-valued entries.
///
/// A `userId` carrying any other JSON type must read as absent; dropping
/// non-string values here enforces that for every key uniformly.
fn parse_session(plaintext: &[u8]) -> Option<HashMap<String, String>> {
    let value: serde_json::Value = serde_json::from_slice(plaintext).ok()?;
    let object = value.as_object()?;

    Some(
        object
            .iter()
            .filter_map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
            .collect(),
    )
}

fn session_cookie(value: &str, max_age: u64) -> std::result::Result<HeaderValue, InvalidHeaderValue> {
    let cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age}; Secure"
    );
    HeaderValue::from_str(&cookie)
}

/// Pick this app's cookie value out of a `Cookie` request header.
fn extract_cookie_value(header: &str) -> Option<&str> {
    for pair in header.split(';') {
        let mut parts = pair.trim().splitn(2, '=');
        let (Some(key), Some(val)) = (parts.next(), parts.next()) else {
            continue;
        };
        if key.trim() == SESSION_COOKIE_NAME {
            return Some(val.trim());
        }
    }
    None
}
