use anyhow::Context;
use clap::Parser;
use recipe_server::config::{Config, StoreKind};
use recipe_server::store::{MemoryRecipeStore, PgRecipeStore};
use recipe_server::{api, db, telemetry, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    if config.openapi {
        println!("{}", api::openapi().to_pretty_json()?);
        return Ok(());
    }

    telemetry::init_telemetry();

    let store: AppState = match config.store {
        StoreKind::Postgres => {
            let pool = db::create_pool(config.database_url()?, config.pool_size)?;
            Arc::new(PgRecipeStore::new(pool))
        }
        StoreKind::Memory => {
            tracing::warn!("Using the in-memory store, recipes will be lost on shutdown");
            Arc::new(MemoryRecipeStore::new())
        }
    };

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    let addr = listener.local_addr()?;

    tracing::info!("Server listening on {}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", addr);
    tracing::info!("OpenAPI spec available at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, recipe_server::app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
