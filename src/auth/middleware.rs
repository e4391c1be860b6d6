//! Session resolution middleware.
//!
//! Turns the session cookie into a [`CurrentUser`] request extension and
//! nothing more; authorization decisions live in the handlers via
//! [`crate::auth::authorizer::Authorizer`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::session::{session_token, SessionStore};
use crate::infra::app_state::AppState;

pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(token) = session_token(request.headers()) {
        let sessions = SessionStore::new(state.pool.clone());
        match sessions.resolve(&token).await {
            Ok(Some(user)) => {
                request.extensions_mut().insert(user);
            }
            Ok(None) => {}
            // A failed lookup downgrades the request to anonymous; the
            // guard will bounce it to the login page.
            Err(e) => warn!(error = %e, "session lookup failed"),
        }
    }

    next.run(request).await
}
