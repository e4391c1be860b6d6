//! Role gate for protected handlers.
//!
//! Every protected handler opens with an explicit
//! `Authorizer::check(current, &[...])` call. The deny branch carries
//! the redirect target and optional notice so handlers just convert it
//! into a response.

use axum::response::{IntoResponse, Redirect, Response};
use tracing::warn;

use super::session::CurrentUser;
use crate::users::Role;
use crate::web::flash::{flash_redirect, Flash};

#[derive(Debug)]
pub enum Access<'a> {
    Allow(&'a CurrentUser),
    Deny(DenyRedirect),
}

#[derive(Debug, PartialEq)]
pub struct DenyRedirect {
    pub to: &'static str,
    pub notice: Option<Flash>,
}

impl IntoResponse for DenyRedirect {
    fn into_response(self) -> Response {
        match self.notice {
            Some(flash) => flash_redirect(flash, self.to),
            None => Redirect::to(self.to).into_response(),
        }
    }
}

pub struct Authorizer;

impl Authorizer {
    /// Check the current session against an allow-list of roles.
    ///
    /// No session redirects to the login page; a session with the wrong
    /// role bounces to its own landing page with a notice.
    pub fn check<'a>(current: Option<&'a CurrentUser>, allowed: &[Role]) -> Access<'a> {
        let Some(user) = current else {
            return Access::Deny(DenyRedirect {
                to: "/login",
                notice: None,
            });
        };

        if allowed.contains(&user.role) {
            return Access::Allow(user);
        }

        warn!(
            username = %user.username,
            role = %user.role,
            "denied access to role-restricted route"
        );

        Access::Deny(DenyRedirect {
            to: user.role.home(),
            notice: Some(Flash::error(
                "You are not authorized to perform this action.",
            )),
        })
    }
}
