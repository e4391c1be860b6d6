//! HTTP surface shared by all handlers: cookie plumbing, flash notices,
//! and server-side HTML views.

pub mod cookies;
pub mod flash;
pub mod view_handlers;
pub mod views;
