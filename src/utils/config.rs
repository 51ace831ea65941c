//! TOML-based configuration for Jokebox.
//!
//! Infrastructure settings (server, database, session) load from an
//! optional `jokebox.toml`; every field has a default so the file can be
//! omitted entirely. Secrets never live in the file: the TOML names the
//! environment variable, the environment holds the value.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::{AppError, Result};

/// Root configuration structure loaded from jokebox.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

// ============= Server Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
        }
    }
}

// ============= Database Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Local database path
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "./data/jokebox.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

// ============= Session Configuration =============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Environment variable name containing the session secrets,
    /// comma-separated in rotation order (first entry signs new sessions,
    /// every entry is tried when verifying existing ones).
    #[serde(default = "default_secrets_env")]
    pub secrets_env: String,
}

fn default_secrets_env() -> String {
    "SESSION_SECRET".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            secrets_env: default_secrets_env(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| AppError::Config(format!("Failed to read {}: {}", path.display(), e)))?;

        toml::from_str(&contents)
            .map_err(|e| AppError::Config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Resolve the session secrets from the configured environment variable.
    ///
    /// An unset variable or an empty list is a startup error, not a
    /// per-request condition: the process must refuse to serve without at
    /// least one secret.
    pub fn session_secrets(&self) -> Result<Vec<String>> {
        let raw = std::env::var(&self.session.secrets_env).map_err(|_| {
            AppError::Config(format!(
                "Environment variable {} must be set to at least one session secret",
                self.session.secrets_env
            ))
        })?;

        let secrets: Vec<String> = raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if secrets.is_empty() {
            return Err(AppError::Config(format!(
                "Environment variable {} contains no usable session secret",
                self.session.secrets_env
            )));
        }

        Ok(secrets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_file_missing() {
        let config = AppConfig::load("does-not-exist.toml").expect("should fall back to defaults");

        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.database.path, "./data/jokebox.db");
        assert_eq!(config.session.secrets_env, "SESSION_SECRET");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml = r#"
            [server]
            port = 8080
        "#;

        let config: AppConfig = toml::from_str(toml).expect("should parse");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.database.path, "./data/jokebox.db");
    }

    #[test]
    fn test_session_secrets_missing_env_is_error() {
        let config = AppConfig {
            session: SessionConfig {
                secrets_env: "JOKEBOX_TEST_UNSET_SECRET".to_string(),
            },
            ..Default::default()
        };

        let result = config.session_secrets();

        assert!(result.is_err(), "missing secret env must fail startup");
    }

    #[test]
    fn test_session_secrets_splits_rotation_list() {
        let config = AppConfig {
            session: SessionConfig {
                secrets_env: "JOKEBOX_TEST_ROTATION_SECRETS".to_string(),
            },
            ..Default::default()
        };

        std::env::set_var("JOKEBOX_TEST_ROTATION_SECRETS", "current, previous ,");
        let secrets = config.session_secrets().expect("should resolve");
        std::env::remove_var("JOKEBOX_TEST_ROTATION_SECRETS");

        assert_eq!(secrets, vec!["current".to_string(), "previous".to_string()]);
    }
}
