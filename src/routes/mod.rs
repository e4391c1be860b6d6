//! Router assembly.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    auth,
    infra::app_state::AppState,
    users::admin_handlers,
    web::view_handlers,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Public endpoints
        .route("/", get(view_handlers::home))
        .route(
            "/register",
            get(auth::handlers::register_form).post(auth::handlers::register),
        )
        .route(
            "/login",
            get(auth::handlers::login_form).post(auth::handlers::login),
        )
        .route("/logout", get(auth::handlers::logout))
        // Role-gated views
        .route("/panel", get(admin_handlers::panel))
        .route("/dashboard", get(view_handlers::dashboard))
        // Admin-only account mutations
        .route("/delete/{user_id}", post(admin_handlers::delete_user))
        .route("/update_role/{user_id}", post(admin_handlers::update_role))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::session_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
