//! Shared scaffolding for the HTTP integration tests.
//!
//! Each test gets its own single-connection in-memory SQLite database so
//! scenarios cannot leak state into each other.

#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum_test::{TestResponse, TestServer};
use sqlx::sqlite::SqlitePoolOptions;
use uuid::Uuid;

use rolegate::{
    db,
    infra::{app_state::AppState, config::Config},
    routes::create_router,
};

pub async fn build_server() -> Result<(TestServer, AppState)> {
    // One connection: a pooled second connection would see a different
    // in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    db::run_migrations(&pool).await?;

    let state = AppState::new(pool, Arc::new(Config::default()));
    let server = TestServer::builder()
        .save_cookies()
        .build(create_router(state.clone()))
        .map_err(|err| anyhow::anyhow!(err.to_string()))?;

    Ok((server, state))
}

pub async fn register(
    server: &TestServer,
    username: &str,
    password: &str,
    role: &str,
) -> TestResponse {
    server
        .post("/register")
        .form(&[
            ("username", username),
            ("password", password),
            ("role", role),
        ])
        .await
}

pub async fn login(server: &TestServer, username: &str, password: &str) -> TestResponse {
    server
        .post("/login")
        .form(&[("username", username), ("password", password)])
        .await
}

/// Register and log in the bootstrap admin (first account may claim the
/// admin role).
pub async fn login_as_admin(server: &TestServer) -> Result<()> {
    let response = register(server, "boss", "bosspw", "admin").await;
    assert_redirect(&response, "/login");
    let response = login(server, "boss", "bosspw").await;
    assert_redirect(&response, "/panel");
    Ok(())
}

pub fn assert_redirect(response: &TestResponse, to: &str) {
    assert_eq!(
        response.status_code(),
        axum::http::StatusCode::SEE_OTHER,
        "expected redirect to {to}, got {}",
        response.status_code()
    );
    let location = response.header("location");
    assert_eq!(location.to_str().unwrap(), to);
}

pub async fn user_count(state: &AppState) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&state.pool)
        .await
        .expect("count users")
}

pub async fn user_id(state: &AppState, username: &str) -> Uuid {
    let id: String = sqlx::query_scalar("SELECT id FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(&state.pool)
        .await
        .expect("user exists");
    Uuid::parse_str(&id).expect("valid uuid")
}

pub async fn session_count(state: &AppState) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
        .fetch_one(&state.pool)
        .await
        .expect("count sessions")
}

/// Backdate every session so it reads as expired.
pub async fn expire_sessions(state: &AppState) {
    sqlx::query("UPDATE sessions SET expires_at = ?")
        .bind(chrono::Utc::now() - chrono::Duration::hours(1))
        .execute(&state.pool)
        .await
        .expect("expire sessions");
}

pub async fn role_of(state: &AppState, username: &str) -> String {
    sqlx::query_scalar("SELECT role FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(&state.pool)
        .await
        .expect("user exists")
}
