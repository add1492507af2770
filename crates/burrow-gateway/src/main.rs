mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;
mod telemetry;

use crate::app::App;
use crate::cli::{Cli, StorageBackendArg};
use crate::state::AppState;
use anyhow::Context;
use burrow_core::Repository;
use burrow_generator::RandomGenerator;
use burrow_shortener::{ShortenerService, ShortenerSettings, UrlValidator, ValidatorSettings};
use burrow_storage::{InMemoryRepository, MySqlRepository};
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Cli::parse();
    telemetry::init(config.log_format)?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        code_length = config.code_length,
        max_attempts = config.max_attempts,
        "starting burrow gateway"
    );

    let generator = RandomGenerator::with_length(config.code_length)?;
    let validator = UrlValidator::dns(
        ValidatorSettings::builder()
            .resolve_timeout(Duration::from_millis(config.dns_timeout_ms))
            .build(),
    );
    let settings = ShortenerSettings::builder()
        .max_attempts(config.max_attempts)
        .build();

    match config.storage {
        StorageBackendArg::InMemory => {
            let service =
                ShortenerService::new(InMemoryRepository::new(), generator, validator, settings);
            run_server(config.listen_addr, service).await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository =
                MySqlRepository::connect(&mysql_dsn, config.mysql_max_connections).await?;
            repository.migrate().await?;
            info!("mysql schema is up to date");

            let service = ShortenerService::new(repository, generator, validator, settings);
            run_server(config.listen_addr, service).await?;
        }
    }

    Ok(())
}

async fn run_server<R: Repository>(
    listen_addr: SocketAddr,
    service: ShortenerService<R, RandomGenerator>,
) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "listening for http requests");

    axum::serve(listener, App::router(AppState::from_service(service)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
