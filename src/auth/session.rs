//! Server-side sessions.
//!
//! A login mints a 32-byte random token; only its SHA-256 hash is
//! persisted, so a leaked database dump cannot be replayed as cookies.
//! Resolving a session joins straight to the user row, which keeps the
//! authenticated role consistent with the stored record.

use axum::http::HeaderMap;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use rand::{rng, RngCore};
use sha2::{Digest, Sha256};
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

use crate::users::{store::StoreError, Role};
use crate::web::cookies::{cookie_value, SESSION_COOKIE};

/// Generates a cryptographically secure 32-byte session token.
pub fn generate_token() -> String {
    let mut token_bytes = [0u8; 32];
    rng().fill_bytes(&mut token_bytes);
    URL_SAFE_NO_PAD.encode(token_bytes)
}

/// Hashes a session token with SHA256 for secure storage.
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// The authenticated identity carried through a request as an extension.
/// Handlers receive this explicitly instead of reading ambient state.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
}

#[derive(Debug, Clone)]
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a session for the user and return the raw cookie token.
    pub async fn create(&self, user_id: Uuid, ttl: Duration) -> Result<String, StoreError> {
        // Housekeeping piggybacks on logins; there is no background task.
        self.purge_expired().await?;

        let token = generate_token();
        let now = Utc::now();

        sqlx::query(
            r#"
            INSERT INTO sessions (token_hash, user_id, created_at, expires_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(hash_token(&token))
        .bind(user_id.to_string())
        .bind(now)
        .bind(now + ttl)
        .execute(&self.pool)
        .await?;

        Ok(token)
    }

    /// Resolve a raw cookie token into the current user, if the session
    /// is live and the user still exists.
    pub async fn resolve(&self, token: &str) -> Result<Option<CurrentUser>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT u.id, u.username, u.role, s.expires_at
            FROM sessions s
            JOIN users u ON u.id = s.user_id
            WHERE s.token_hash = ?
            "#,
        )
        .bind(hash_token(token))
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let expires_at: DateTime<Utc> = row.get("expires_at");
        if expires_at < Utc::now() {
            self.delete(token).await?;
            return Ok(None);
        }

        let id: String = row.get("id");
        let role: String = row.get("role");

        Ok(Some(CurrentUser {
            id: Uuid::parse_str(&id)
                .map_err(|_| StoreError::Corrupt(format!("invalid user id `{}`", id)))?,
            username: row.get("username"),
            role: Role::parse(&role)
                .ok_or_else(|| StoreError::Corrupt(format!("unknown role `{}`", role)))?,
        }))
    }

    pub async fn delete(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn purge_expired(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
            .bind(Utc::now())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// The raw session token from the request cookie, if present.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    cookie_value(headers, SESSION_COOKIE)
}
