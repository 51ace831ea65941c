//! Embedded libsql store for users and jokes.

use chrono::Utc;
use libsql::{Builder, Connection, Database};

use crate::types::{AppError, Result};

/// A stored user record.
#[derive(Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub created_at: i64,
}

/// A stored joke record.
#[derive(Debug, Clone)]
pub struct Joke {
    pub id: String,
    pub name: String,
    pub content: String,
    pub jokester_id: String,
    pub created_at: i64,
}

/// Relational store backed by an embedded libsql database.
pub struct Store {
    db: Database,
}

impl Store {
    /// Open (or create) a database file at the given path.
    pub async fn new_local(path: &str) -> Result<Self> {
        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        let store = Self { db };
        store.initialize_schema().await?;

        Ok(store)
    }

    /// In-memory database for tests.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    pub fn connection(&self) -> Result<Connection> {
        self.db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))
    }

    async fn initialize_schema(&self) -> Result<()> {
        let conn = self.connection()?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create users table: {}", e)))?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS jokes (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                content TEXT NOT NULL,
                jokester_id TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                FOREIGN KEY (jokester_id) REFERENCES users(id)
            )",
            (),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create jokes table: {}", e)))?;

        Ok(())
    }

    // User operations

    /// Insert a new user. A duplicate username trips the UNIQUE constraint
    /// and is reported as [`AppError::Conflict`].
    pub async fn create_user(&self, id: &str, username: &str, password_hash: &str) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO users (id, username, password_hash, created_at)
             VALUES (?, ?, ?, ?)",
            (id, username, password_hash, now),
        )
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint") {
                AppError::Conflict(format!("Username {} already exists", username))
            } else {
                AppError::Database(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(())
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, username, password_hash, created_at
                 FROM users WHERE username = ?",
                [username],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(User {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, username, password_hash, created_at
                 FROM users WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query user: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(User {
                id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
                username: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
                password_hash: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
                created_at: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
            }))
        } else {
            Ok(None)
        }
    }

    /// Remove a user. Administrative operation; the auth core never calls
    /// it, but stale-session behavior depends on it existing.
    pub async fn delete_user(&self, id: &str) -> Result<()> {
        let conn = self.connection()?;

        conn.execute("DELETE FROM users WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete user: {}", e)))?;

        Ok(())
    }

    // Joke operations

    pub async fn create_joke(
        &self,
        id: &str,
        name: &str,
        content: &str,
        jokester_id: &str,
    ) -> Result<()> {
        let conn = self.connection()?;
        let now = Utc::now().timestamp();

        conn.execute(
            "INSERT INTO jokes (id, name, content, jokester_id, created_at)
             VALUES (?, ?, ?, ?, ?)",
            (id, name, content, jokester_id, now),
        )
        .await
        .map_err(|e| AppError::Database(format!("Failed to create joke: {}", e)))?;

        Ok(())
    }

    pub async fn get_joke(&self, id: &str) -> Result<Option<Joke>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, content, jokester_id, created_at
                 FROM jokes WHERE id = ?",
                [id],
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query joke: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(row_to_joke(&row)?))
        } else {
            Ok(None)
        }
    }

    /// All jokes, newest first.
    pub async fn list_jokes(&self) -> Result<Vec<Joke>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, content, jokester_id, created_at
                 FROM jokes ORDER BY created_at DESC",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to list jokes: {}", e)))?;

        let mut jokes = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            jokes.push(row_to_joke(&row)?);
        }

        Ok(jokes)
    }

    pub async fn random_joke(&self) -> Result<Option<Joke>> {
        let conn = self.connection()?;

        let mut rows = conn
            .query(
                "SELECT id, name, content, jokester_id, created_at
                 FROM jokes ORDER BY RANDOM() LIMIT 1",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to pick joke: {}", e)))?;

        if let Some(row) = rows
            .next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            Ok(Some(row_to_joke(&row)?))
        } else {
            Ok(None)
        }
    }
}

fn row_to_joke(row: &libsql::Row) -> Result<Joke> {
    Ok(Joke {
        id: row.get(0).map_err(|e| AppError::Database(e.to_string()))?,
        name: row.get(1).map_err(|e| AppError::Database(e.to_string()))?,
        content: row.get(2).map_err(|e| AppError::Database(e.to_string()))?,
        jokester_id: row.get(3).map_err(|e| AppError::Database(e.to_string()))?,
        created_at: row.get(4).map_err(|e| AppError::Database(e.to_string()))?,
    })
}
