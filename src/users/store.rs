//! SQLite persistence for user records.
//!
//! The store owns all user rows; nothing else writes to the `users`
//! table. Each mutation is a single statement (or one transaction) and
//! relies on SQLite's atomicity.

use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

use super::{Role, RoleCounts, User};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username already exists")]
    DuplicateUsername,
    #[error("user not found")]
    NotFound,
    #[error("corrupt user record: {0}")]
    Corrupt(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &SqliteRow) -> Result<User, StoreError> {
        let id: String = row.get("id");
        let role: String = row.get("role");

        Ok(User {
            id: Uuid::parse_str(&id)
                .map_err(|_| StoreError::Corrupt(format!("invalid user id `{}`", id)))?,
            username: row.get("username"),
            role: Role::parse(&role)
                .ok_or_else(|| StoreError::Corrupt(format!("unknown role `{}`", role)))?,
            created_at: row.get::<DateTime<Utc>, _>("created_at"),
        })
    }

    pub async fn create(&self, user: &User, password_hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, password_hash, role, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id.to_string())
        .bind(&user.username)
        .bind(password_hash)
        .bind(user.role.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .map(|db| db.is_unique_violation())
                .unwrap_or(false)
            {
                StoreError::DuplicateUsername
            } else {
                StoreError::Database(e)
            }
        })?;

        Ok(())
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, username, role, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let row = sqlx::query("SELECT id, username, role, created_at FROM users WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    pub async fn password_hash(&self, id: Uuid) -> Result<Option<String>, StoreError> {
        let hash = sqlx::query_scalar::<_, String>(
            "SELECT password_hash FROM users WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        Ok(hash)
    }

    pub async fn list_all(&self) -> Result<Vec<User>, StoreError> {
        let rows = sqlx::query(
            "SELECT id, username, role, created_at FROM users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_user).collect()
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    pub async fn role_counts(&self) -> Result<RoleCounts, StoreError> {
        let rows = sqlx::query("SELECT role, COUNT(*) AS total FROM users GROUP BY role")
            .fetch_all(&self.pool)
            .await?;

        let mut counts = RoleCounts::default();
        for row in rows {
            let role: String = row.get("role");
            let total: i64 = row.get("total");
            match Role::parse(&role) {
                Some(Role::Admin) => counts.admin = total,
                Some(Role::Manager) => counts.manager = total,
                Some(Role::User) => counts.user = total,
                // Unknown role strings cannot be written through this
                // store; ignore rather than fail the whole panel.
                None => {}
            }
        }

        Ok(counts)
    }

    /// Delete a user and their sessions in one transaction.
    pub async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn update_role(&self, id: Uuid, role: Role) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(role.as_str())
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }
}
