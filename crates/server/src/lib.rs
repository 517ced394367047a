//! # Buyback Admin Server
//!
//! The HTTP surface of the buyback admin backend: the CSV import endpoint
//! plus the CRUD pass-throughs for catalog, multipliers, tips, and leads.
//! All routes talk to the hosted store through the service-role client,
//! so this server must only ever be reachable by operators.

pub mod config;
pub mod errors;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

use crate::{config::get_config, router::create_router, state::build_app_state};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{debug, info};
use tracing_subscriber::FmtSubscriber;

/// Configures and runs the web server on an already-bound listener.
pub async fn run(listener: TcpListener, config: config::Config) -> anyhow::Result<()> {
    debug!(port = config.port, "Server configuration loaded");

    let app_state = build_app_state(config)?;
    let app = create_router(app_state);

    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

/// The binary's main entry point.
///
/// Sets up logging, configuration, and the TCP listener, then calls `run`.
pub async fn start() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = get_config()?;
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = TcpListener::bind(addr).await?;
    info!("Server listening on {}", addr);

    run(listener, config).await
}
