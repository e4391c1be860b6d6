//! Server-rendered HTML views.
//!
//! Pages are small enough that string builders with strict escaping beat
//! a templating engine here. All user-supplied text goes through
//! [`escape`] before it reaches markup.

use axum::{
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, Html, IntoResponse, Response},
};

use crate::auth::session::CurrentUser;
use crate::users::{Role, RoleCounts, User};
use crate::web::flash::{self, Flash, Level};

/// Escape text for HTML element and attribute context.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn flash_banner(flash: Option<&Flash>) -> String {
    match flash {
        Some(f) => {
            let class = match f.level {
                Level::Success => "notice notice-success",
                Level::Error => "notice notice-error",
            };
            format!(r#"<p class="{}">{}</p>"#, class, escape(&f.message))
        }
        None => String::new(),
    }
}

fn layout(title: &str, flash: Option<&Flash>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} - Rolegate</title>
</head>
<body>
{banner}
{body}
</body>
</html>
"#,
        title = escape(title),
        banner = flash_banner(flash),
        body = body,
    )
}

/// Render a page, consuming any pending flash notice.
pub fn page(headers: &HeaderMap, build: impl FnOnce(Option<&Flash>) -> String) -> Response {
    match flash::peek(headers) {
        Some(flash) => (
            AppendHeaders([(header::SET_COOKIE, Flash::clear_cookie())]),
            Html(build(Some(&flash))),
        )
            .into_response(),
        None => Html(build(None)).into_response(),
    }
}

pub fn login_page(flash: Option<&Flash>) -> String {
    layout(
        "Login",
        flash,
        r#"<h1>Login</h1>
<form method="post" action="/login">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="/register">Register</a></p>"#,
    )
}

pub fn register_page(flash: Option<&Flash>, first_account: bool) -> String {
    // The first account may claim admin to bootstrap the instance; after
    // that, registration only ever creates plain users.
    let role_field = if first_account {
        r#"<label>Role
<select name="role">
<option value="user" selected>user</option>
<option value="admin">admin</option>
</select>
</label>
"#
    } else {
        r#"<input type="hidden" name="role" value="user">
"#
    };

    let body = format!(
        r#"<h1>Register</h1>
<form method="post" action="/register">
<label>Username <input type="text" name="username" required></label>
<label>Password <input type="password" name="password" required></label>
{role_field}<button type="submit">Register</button>
</form>
<p>Already registered? <a href="/login">Login</a></p>"#,
        role_field = role_field,
    );
    layout("Register", flash, &body)
}

pub fn dashboard_page(flash: Option<&Flash>, current: &CurrentUser) -> String {
    let body = format!(
        r#"<h1>Dashboard</h1>
<p>Welcome, {username}.</p>
<p><a href="/logout">Log out</a></p>"#,
        username = escape(&current.username),
    );
    layout("Dashboard", flash, &body)
}

fn user_row(current: &CurrentUser, user: &User) -> String {
    let mut actions = String::new();

    // Only admins mutate accounts, and never their own.
    if current.role == Role::Admin && user.id != current.id {
        let options: String = Role::ALL
            .iter()
            .map(|role| {
                let selected = if *role == user.role { " selected" } else { "" };
                format!(
                    r#"<option value="{role}"{selected}>{role}</option>"#,
                    role = role.as_str(),
                    selected = selected,
                )
            })
            .collect();

        actions = format!(
            r#"<form method="post" action="/update_role/{id}">
<select name="role">{options}</select>
<button type="submit">Update role</button>
</form>
<form method="post" action="/delete/{id}">
<button type="submit">Delete</button>
</form>"#,
            id = user.id,
            options = options,
        );
    }

    format!(
        r#"<tr><td>{username}</td><td>{role}</td><td>{actions}</td></tr>"#,
        username = escape(&user.username),
        role = user.role,
        actions = actions,
    )
}

pub fn panel_page(
    flash: Option<&Flash>,
    current: &CurrentUser,
    users: &[User],
    counts: RoleCounts,
) -> String {
    let rows: String = users.iter().map(|u| user_row(current, u)).collect();

    let body = format!(
        r#"<h1>Panel</h1>
<p>Signed in as {username} ({role}).</p>
<ul>
<li>Admins: <span id="admin_count">{admins}</span></li>
<li>Managers: <span id="manager_count">{managers}</span></li>
<li>Users: <span id="user_count">{users_count}</span></li>
</ul>
<table>
<thead><tr><th>Username</th><th>Role</th><th>Actions</th></tr></thead>
<tbody>
{rows}
</tbody>
</table>
<p><a href="/logout">Log out</a></p>"#,
        username = escape(&current.username),
        role = current.role,
        admins = counts.admin,
        managers = counts.manager,
        users_count = counts.user,
        rows = rows,
    );
    layout("Panel", flash, &body)
}

pub fn error_page(status: StatusCode, message: &str) -> String {
    let body = format!(
        r#"<h1>{code} {reason}</h1>
<p>{message}</p>
<p><a href="/">Back</a></p>"#,
        code = status.as_u16(),
        reason = status.canonical_reason().unwrap_or("Error"),
        message = escape(message),
    );
    layout("Error", None, &body)
}
