//! # Rolegate server
//!
//! Role-gated account portal: registration, login, a shared
//! admin/manager panel, and a user dashboard, backed by SQLite.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rolegate::{
    db,
    infra::{app_state::AppState, config::Config},
    routes::create_router,
};

#[derive(Parser, Debug)]
#[command(name = "rolegate")]
#[command(about = "Role-gated account portal with an admin panel and a user dashboard")]
struct Cli {
    /// Server host
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    port: u16,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = db::DEFAULT_DATABASE_URL)]
    database_url: String,

    /// Session lifetime in hours
    #[arg(long, env = "SESSION_TTL_HOURS", default_value_t = 24)]
    session_ttl_hours: i64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config {
        host: cli.host,
        port: cli.port,
        database_url: cli.database_url,
        session_ttl_hours: cli.session_ttl_hours,
    });

    let pool = db::connect(&config.database_url).await?;
    let state = AppState::new(pool, config.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!("listening on {}", addr);

    axum::serve(listener, app)
        .await
        .context("server exited with an error")?;

    Ok(())
}
