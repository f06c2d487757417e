use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use clap::Parser;
use tracing::{error, info};

mod config;
mod db;
mod error;
mod logging;
mod models;
mod routes;
mod seed;
mod service;

use config::Config;
use db::Database;
use service::SqliteTodoService;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();
    logging::init(config.log_level())?;

    {
        let db = Database::open(&config.database)?;
        db.create_schema()
            .with_context(|| format!("creating schema in {}", config.database.display()))?;
        if config.seed {
            seed::seed(&db)?;
        }
    }

    let cors_origin = HeaderValue::from_str(&config.cors_origin)
        .with_context(|| format!("invalid CORS origin {:?}", config.cors_origin))?;
    let service = Arc::new(SqliteTodoService::new(&config.database));
    let database = service.db_path().display().to_string();
    let app = routes::router(service, cors_origin);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, %database, "todolists listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(%err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
