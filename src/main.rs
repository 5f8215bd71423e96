//! Application entry point for the `event-advisor` web service.
//!
//! Startup sequence:
//! - Load configuration from environment variables or `.env`
//! - Initialize structured logging/tracing
//! - Load the trained classifier and its encoders (read-only from here on)
//! - Open the SQLite pool and create the schema if it does not exist
//! - Mount all routes via the `routes` gateway (EMBP pattern)
//! - Bind the Axum HTTP server and serve requests
//!
//! # Environment Variables
//! - `DATABASE_URL` (optional) – SQLite connection string
//! - `DB_POOL_MAX` (optional) – maximum number of DB connections (default: 5)
//! - `BIND_ADDR` (optional) – listen address (default: `0.0.0.0:8080`)
//! - `MODEL_PATH`, `LOCATION_ENCODER_PATH`, `EVENT_ENCODER_PATH` (optional)
//! - `AXUM_LOG_LEVEL` (optional) – log verbosity (default: `debug`)
//! - `AXUM_SPAN_EVENTS` (optional) – span event mode for tracing
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use dotenvy::dotenv;
use sqlx::sqlite::SqlitePoolOptions;

use event_advisor::gateway::GbdtEventModel;
use event_advisor::{config, routes, schema, telemetry, AppContext, EventPredictor};

// ---

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    dotenv().ok();
    telemetry::init_tracing();

    let cfg = config::load_from_env()?;
    cfg.log_config();

    let model = GbdtEventModel::load(
        &cfg.artifacts.model,
        &cfg.artifacts.location_encoder,
        &cfg.artifacts.event_encoder,
    )
    .with_context(|| format!("Failed to load model artifacts from '{}'", cfg.artifacts.model))?;
    tracing::info!(
        "Model loaded: {} locations, {} event classes",
        model.locations().len(),
        model.event_classes().len()
    );

    tracing::info!("Attempting to connect to database: {}", cfg.db_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.db_pool_max)
        .connect(&cfg.db_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to connect to database '{}': {}", cfg.db_url, e))?;

    tracing::info!("Successfully connected to database");

    schema::create_schema(&pool).await?;

    let ctx = AppContext::new(pool, Arc::new(model));
    let app: Router = routes::router(ctx);

    tracing::info!("Listening on {}", cfg.bind_addr);

    let listener = tokio::net::TcpListener::bind(cfg.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
