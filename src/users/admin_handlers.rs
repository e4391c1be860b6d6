//! Panel view and admin-only account mutations.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    Extension, Form,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::{store::StoreError, store::UserStore, Role};
use crate::{
    auth::{
        authorizer::{Access, Authorizer},
        session::CurrentUser,
    },
    errors::AppResult,
    infra::app_state::AppState,
    web::{
        flash::{flash_redirect, Flash},
        views,
    },
};

/// Shared admin/manager panel: every account plus per-role totals.
pub async fn panel(
    State(state): State<AppState>,
    current: Option<Extension<CurrentUser>>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let current = current.map(|Extension(user)| user);

    let user = match Authorizer::check(current.as_ref(), &[Role::Admin, Role::Manager]) {
        Access::Allow(user) => user,
        Access::Deny(deny) => return Ok(deny.into_response()),
    };

    let store = UserStore::new(state.pool.clone());
    let users = store.list_all().await?;
    let counts = store.role_counts().await?;

    Ok(views::page(&headers, |flash| {
        views::panel_page(flash, user, &users, counts)
    }))
}

pub async fn delete_user(
    State(state): State<AppState>,
    current: Option<Extension<CurrentUser>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Response> {
    let current = current.map(|Extension(user)| user);

    let acting = match Authorizer::check(current.as_ref(), &[Role::Admin]) {
        Access::Allow(user) => user,
        Access::Deny(deny) => return Ok(deny.into_response()),
    };

    if acting.id == user_id {
        return Ok(flash_redirect(
            Flash::error("You can't delete your own account."),
            "/panel",
        ));
    }

    let store = UserStore::new(state.pool.clone());
    match store.delete(user_id).await {
        Ok(()) => {
            info!(target_id = %user_id, deleted_by = %acting.username, "user deleted");
            Ok(flash_redirect(
                Flash::success("User deleted successfully."),
                "/panel",
            ))
        }
        Err(StoreError::NotFound) => Ok(flash_redirect(Flash::error("User not found."), "/panel")),
        Err(e) => Err(e.into()),
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRoleForm {
    pub role: String,
}

pub async fn update_role(
    State(state): State<AppState>,
    current: Option<Extension<CurrentUser>>,
    Path(user_id): Path<Uuid>,
    Form(form): Form<UpdateRoleForm>,
) -> AppResult<Response> {
    let current = current.map(|Extension(user)| user);

    let acting = match Authorizer::check(current.as_ref(), &[Role::Admin]) {
        Access::Allow(user) => user,
        Access::Deny(deny) => return Ok(deny.into_response()),
    };

    if acting.id == user_id {
        return Ok(flash_redirect(
            Flash::error("You can't change your own role."),
            "/panel",
        ));
    }

    let Some(role) = Role::parse(&form.role) else {
        return Ok(flash_redirect(Flash::error("Unknown role."), "/panel"));
    };

    let store = UserStore::new(state.pool.clone());
    match store.update_role(user_id, role).await {
        Ok(()) => {
            info!(
                target_id = %user_id,
                new_role = %role,
                changed_by = %acting.username,
                "role updated"
            );
            Ok(flash_redirect(
                Flash::success("Role updated successfully."),
                "/panel",
            ))
        }
        Err(StoreError::NotFound) => Ok(flash_redirect(Flash::error("User not found."), "/panel")),
        Err(e) => Err(e.into()),
    }
}
