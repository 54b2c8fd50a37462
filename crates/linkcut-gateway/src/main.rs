mod app;
mod cli;
mod error;
mod handlers;
mod model;
mod state;
mod user;

use crate::app::App;
use crate::cli::{StorageBackendArg, CLI};
use crate::state::AppState;
use anyhow::Context;
use clap::Parser;
use linkcut_core::Storage;
use linkcut_storage::{FileStorage, MemoryStorage, PostgresStorage};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = CLI::try_parse()?;
    let base_url = config.base_url()?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %base_url,
        storage_backend = %config.storage,
        "starting linkcut gateway"
    );

    let storage: Arc<dyn Storage> = match config.storage {
        StorageBackendArg::Memory => Arc::new(MemoryStorage::new(base_url)),
        StorageBackendArg::File => {
            let path = config
                .file_path
                .clone()
                .context("file path is required when storage backend is file")?;
            Arc::new(FileStorage::open(base_url, path)?)
        }
        StorageBackendArg::Postgres => {
            let dsn = config
                .postgres_dsn
                .as_deref()
                .context("database dsn is required when storage backend is postgres")?;
            let storage = PostgresStorage::connect(base_url, dsn).await;
            // A DDL failure means the schema cannot be trusted; do not serve.
            storage.bootstrap().await?;
            Arc::new(storage)
        }
    };

    let router = App::router(AppState::new(storage));
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
