//! Review Assign - pull request reviewer assignment service.
//!
//! Teams of users author pull requests; each new pull request gets up to two
//! reviewers picked from the author's team by current workload. The crate
//! exposes the engine as library functions (`services`), typed request
//! handlers (`commands`) and an axum HTTP server (`server`).

pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod server;
pub mod services;

use config::{Config, ConfigError};
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Failure while bringing the service up or running it.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Database(#[from] db::DbError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        source: std::io::Error,
    },

    #[error(transparent)]
    Server(#[from] server::ServerError),
}

/// Run the service until `cancel` fires.
pub async fn run(config: Config, cancel: CancellationToken) -> Result<(), StartupError> {
    let addr = config.serve_addr()?;

    log::info!("Opening database at {}", config.database_path.display());
    let pool = db::initialize(&config.database_path).await?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    let app = server::router(pool.clone(), config.request_timeout());
    server::serve(listener, app, cancel, config.shutdown_timeout()).await?;

    pool.close().await;
    Ok(())
}
