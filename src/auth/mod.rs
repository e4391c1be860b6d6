//! Session establishment and role-based authorization.

pub mod authorizer;
pub mod handlers;
pub mod middleware;
pub mod session;
