// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Portfolio API Service
//!
//! Serves project/skill CRUD and the guarded contact form consumed by the
//! portfolio SPA.
//!
//! ## Configuration
//!
//! Configuration is loaded from environment variables (a `.env` file is
//! honored):
//!
//! - `BIND_ADDR`: Server bind address (default: 0.0.0.0:8080)
//! - `DATABASE_PATH`: Store path, or "memory" (default: memory)
//! - `THROTTLE_WINDOW_SECS`: Seconds between submissions per client (default: 30)
//! - `MAIL_ENDPOINT`: HTTP mail API endpoint; mail is disabled when unset
//! - `MAIL_API_KEY`: Bearer token for the mail API
//! - `MAIL_FROM` / `MAIL_TO`: Notification addresses

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use portfolio_api::{
    config::Config,
    db::Database,
    gate::SubmissionGate,
    handlers::AppState,
    limiter::{SubmissionThrottle, Sweeper},
    mailer::Mailer,
    routes,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Load configuration
    let config = load_config();
    info!(
        bind_addr = %config.bind_addr,
        database_path = %config.database.path,
        throttle_window_secs = config.throttle.window_secs,
        mail_enabled = config.mail.enabled(),
        "Starting portfolio API"
    );

    // Connect the store and build application state
    let db = Database::connect(&config.database.path).await?;
    let gate = SubmissionGate::new(config.gate.clone())?;
    let throttle = SubmissionThrottle::new(config.throttle.clone());
    let mailer = Mailer::from_config(&config.mail);

    // Start the throttle eviction sweep; the handle keeps it stoppable
    let sweeper = Sweeper::start(throttle.clone(), config.throttle.sweep_interval());

    let state = Arc::new(AppState {
        db,
        gate,
        throttle,
        mailer,
        config: config.clone(),
    });

    // Build router
    let app = routes::router(state);

    // Start server
    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    sweeper.stop().await;

    Ok(())
}

/// Load configuration from environment variables.
fn load_config() -> Config {
    let mut config = Config::default();

    if let Ok(bind_addr) = std::env::var("BIND_ADDR") {
        config.bind_addr = bind_addr;
    }
    if let Ok(path) = std::env::var("DATABASE_PATH") {
        config.database.path = path;
    }
    if let Some(window) = env_parse("THROTTLE_WINDOW_SECS") {
        config.throttle.window_secs = window;
    }
    config.mail.endpoint = std::env::var("MAIL_ENDPOINT").ok();
    config.mail.api_key = std::env::var("MAIL_API_KEY").ok();
    if let Ok(from) = std::env::var("MAIL_FROM") {
        config.mail.from = from;
    }
    if let Ok(to) = std::env::var("MAIL_TO") {
        config.mail.to = to;
    }

    config
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
