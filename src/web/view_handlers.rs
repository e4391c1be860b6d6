//! Public entry point and the user dashboard.

use axum::{
    http::HeaderMap,
    response::{IntoResponse, Redirect, Response},
    Extension,
};

use crate::auth::{
    authorizer::{Access, Authorizer},
    session::CurrentUser,
};
use crate::users::Role;
use crate::web::views;

pub async fn home() -> Response {
    Redirect::to("/login").into_response()
}

pub async fn dashboard(
    current: Option<Extension<CurrentUser>>,
    headers: HeaderMap,
) -> Response {
    let current = current.map(|Extension(user)| user);

    let user = match Authorizer::check(current.as_ref(), &[Role::User]) {
        Access::Allow(user) => user,
        Access::Deny(deny) => return deny.into_response(),
    };

    views::page(&headers, |flash| views::dashboard_page(flash, user))
}
