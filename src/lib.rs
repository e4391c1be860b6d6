//! # Rolegate
//!
//! A small role-gated account portal.
//!
//! Users register and log in; a session cookie backed by a server-side
//! session row routes them to the shared admin/manager panel or the user
//! dashboard depending on their role. Admins can delete other accounts
//! and reassign roles from the panel.
//!
//! The server is built on Axum and uses:
//! - SQLite (via sqlx) for users and sessions
//! - Argon2 for password hashing
//! - Opaque random session tokens, stored hashed

pub mod auth;
pub mod db;
pub mod errors;
pub mod infra;
pub mod routes;
pub mod users;
pub mod web;
