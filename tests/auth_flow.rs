//! Registration, login, logout, and role-based routing.

use anyhow::Result;
use axum::http::StatusCode;

mod support;

use support::{assert_redirect, build_server, login, login_as_admin, register, user_id};

#[tokio::test]
async fn home_redirects_to_login() -> Result<()> {
    let (server, _state) = build_server().await?;

    let response = server.get("/").await;
    assert_redirect(&response, "/login");
    Ok(())
}

#[tokio::test]
async fn register_then_login_lands_on_dashboard() -> Result<()> {
    let (server, _state) = build_server().await?;

    let response = register(&server, "alice", "pw1", "user").await;
    assert_redirect(&response, "/login");

    let response = login(&server, "alice", "pw1").await;
    assert_redirect(&response, "/dashboard");

    let response = server.get("/dashboard").await;
    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("alice"));
    Ok(())
}

#[tokio::test]
async fn login_with_wrong_password_bounces_back() -> Result<()> {
    let (server, _state) = build_server().await?;

    register(&server, "alice", "pw1", "user").await;

    let response = login(&server, "alice", "wrong").await;
    assert_redirect(&response, "/login");

    // Unknown usernames get the same response.
    let response = login(&server, "nobody", "pw1").await;
    assert_redirect(&response, "/login");

    // The notice shows up on the next render of the login page.
    let response = server.get("/login").await;
    response.assert_status(StatusCode::OK);
    assert!(response.text().contains("Invalid credentials."));
    Ok(())
}

#[tokio::test]
async fn protected_routes_without_session_redirect_to_login() -> Result<()> {
    let (server, _state) = build_server().await?;

    for route in ["/panel", "/dashboard"] {
        let response = server.get(route).await;
        assert_redirect(&response, "/login");
    }

    let target = uuid::Uuid::new_v4();
    let response = server.post(&format!("/delete/{}", target)).await;
    assert_redirect(&response, "/login");

    let response = server
        .post(&format!("/update_role/{}", target))
        .form(&[("role", "manager")])
        .await;
    assert_redirect(&response, "/login");
    Ok(())
}

#[tokio::test]
async fn admin_lands_on_panel_and_is_bounced_from_dashboard() -> Result<()> {
    let (server, _state) = build_server().await?;

    login_as_admin(&server).await?;

    let response = server.get("/panel").await;
    response.assert_status(StatusCode::OK);

    let response = server.get("/dashboard").await;
    assert_redirect(&response, "/panel");
    Ok(())
}

#[tokio::test]
async fn manager_shares_the_panel_but_not_admin_routes() -> Result<()> {
    let (server, state) = build_server().await?;

    login_as_admin(&server).await?;
    register(&server, "carol", "pw1", "user").await;

    let carol = user_id(&state, "carol").await;
    let response = server
        .post(&format!("/update_role/{}", carol))
        .form(&[("role", "manager")])
        .await;
    assert_redirect(&response, "/panel");

    let response = login(&server, "carol", "pw1").await;
    assert_redirect(&response, "/panel");

    let response = server.get("/panel").await;
    response.assert_status(StatusCode::OK);

    // Manager may see the panel but not mutate accounts.
    let boss = user_id(&state, "boss").await;
    let response = server.post(&format!("/delete/{}", boss)).await;
    assert_redirect(&response, "/panel");
    assert_eq!(support::user_count(&state).await, 2);
    Ok(())
}

#[tokio::test]
async fn user_is_bounced_from_the_panel() -> Result<()> {
    let (server, _state) = build_server().await?;

    register(&server, "alice", "pw1", "user").await;
    login(&server, "alice", "pw1").await;

    let response = server.get("/panel").await;
    assert_redirect(&response, "/dashboard");

    // The denial notice lands on the dashboard render.
    let response = server.get("/dashboard").await;
    response.assert_status(StatusCode::OK);
    assert!(response
        .text()
        .contains("You are not authorized to perform this action."));
    Ok(())
}

#[tokio::test]
async fn expired_session_is_anonymous_and_gets_purged() -> Result<()> {
    let (server, state) = build_server().await?;

    register(&server, "alice", "pw1", "user").await;
    login(&server, "alice", "pw1").await;
    assert_eq!(support::session_count(&state).await, 1);

    support::expire_sessions(&state).await;

    // An expired session no longer authenticates, and lookup drops the row.
    let response = server.get("/dashboard").await;
    assert_redirect(&response, "/login");
    assert_eq!(support::session_count(&state).await, 0);

    // Stale rows that were never looked up again get swept on login.
    let response = login(&server, "alice", "pw1").await;
    assert_redirect(&response, "/dashboard");
    support::expire_sessions(&state).await;

    let response = login(&server, "alice", "pw1").await;
    assert_redirect(&response, "/dashboard");
    assert_eq!(support::session_count(&state).await, 1);
    Ok(())
}

#[tokio::test]
async fn logout_clears_the_session() -> Result<()> {
    let (server, _state) = build_server().await?;

    register(&server, "alice", "pw1", "user").await;
    login(&server, "alice", "pw1").await;

    let response = server.get("/logout").await;
    assert_redirect(&response, "/login");

    let response = server.get("/dashboard").await;
    assert_redirect(&response, "/login");
    Ok(())
}
