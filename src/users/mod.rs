//! User accounts and role assignment.

pub mod admin_handlers;
pub mod store;
pub mod user_service;

use chrono::{DateTime, Utc};
use std::fmt;
use uuid::Uuid;

/// Closed set of roles understood by the portal.
///
/// Role strings from the outside world (registration forms, role-update
/// forms, database rows) must parse into this enum; anything else is
/// rejected at the write boundary and never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Manager,
    User,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Manager, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::User => "user",
        }
    }

    pub fn parse(value: &str) -> Option<Role> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Role::Admin),
            "manager" => Some(Role::Manager),
            "user" => Some(Role::User),
            _ => None,
        }
    }

    /// Admins and managers share the panel view; everyone else gets the
    /// dashboard.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Manager)
    }

    /// Landing page for this role after login or a denied request.
    pub fn home(&self) -> &'static str {
        if self.is_staff() {
            "/panel"
        } else {
            "/dashboard"
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Per-role account totals shown on the panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoleCounts {
    pub admin: i64,
    pub manager: i64,
    pub user: i64,
}
