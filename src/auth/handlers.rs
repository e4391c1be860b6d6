//! Login, registration, and logout handlers.

use axum::{
    extract::State,
    http::{header, HeaderMap},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    Form,
};
use serde::Deserialize;
use tracing::info;

use super::session::{session_token, SessionStore};
use crate::{
    errors::{AppError, AppResult},
    infra::app_state::AppState,
    users::{
        store::UserStore,
        user_service::{self, AuthError, RegisterError},
    },
    web::{
        cookies::{clear_session_cookie, session_cookie},
        flash::{flash_redirect, Flash},
        views,
    },
};

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
}

fn default_role() -> String {
    "user".to_string()
}

pub async fn login_form(headers: HeaderMap) -> Response {
    views::page(&headers, |flash| views::login_page(flash))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    let store = UserStore::new(state.pool.clone());

    let user = match user_service::authenticate(&store, &form.username, &form.password).await {
        Ok(user) => user,
        Err(AuthError::InvalidCredentials) | Err(AuthError::BadHash) => {
            return Ok(flash_redirect(Flash::error("Invalid credentials."), "/login"));
        }
        Err(AuthError::Store(e)) => return Err(e.into()),
    };

    let ttl = state.config.session_ttl();
    let sessions = SessionStore::new(state.pool.clone());
    let token = sessions.create(user.id, ttl).await?;

    info!(username = %user.username, role = %user.role, "user logged in");

    Ok((
        AppendHeaders([(
            header::SET_COOKIE,
            session_cookie(&token, ttl.num_seconds()),
        )]),
        Redirect::to(user.role.home()),
    )
        .into_response())
}

pub async fn register_form(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let store = UserStore::new(state.pool.clone());
    let first_account = store.count().await? == 0;
    Ok(views::page(&headers, |flash| {
        views::register_page(flash, first_account)
    }))
}

pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    let store = UserStore::new(state.pool.clone());

    match user_service::register(&store, &form.username, &form.password, &form.role).await {
        Ok(_) => Ok(flash_redirect(
            Flash::success("Registration successful."),
            "/login",
        )),
        Err(RegisterError::Store(e)) => Err(AppError::from(e)),
        Err(e) => Ok(flash_redirect(Flash::error(e.to_string()), "/register")),
    }
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if let Some(token) = session_token(&headers) {
        let sessions = SessionStore::new(state.pool.clone());
        sessions.delete(&token).await?;
        info!("user logged out");
    }

    let flash = Flash::success("Logged out successfully.");
    Ok((
        AppendHeaders([
            (header::SET_COOKIE, clear_session_cookie()),
            (header::SET_COOKIE, flash.set_cookie()),
        ]),
        Redirect::to("/login"),
    )
        .into_response())
}
