//! Runtime configuration.
//!
//! Every knob has a default that works for local development; the CLI in
//! `main.rs` overrides them from flags or environment variables.

use crate::db::DEFAULT_DATABASE_URL;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Lifetime of a session row, in hours.
    pub session_ttl_hours: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            session_ttl_hours: 24,
        }
    }
}

impl Config {
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.session_ttl_hours)
    }
}
