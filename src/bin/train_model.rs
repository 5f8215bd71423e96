//! `train-model`: fit the event classifier from a historical CSV and write
//! the model and encoder artifacts the web service loads at startup.
//!
//! # Environment Variables
//! - `TRAINING_CSV` (**required**) – CSV with `Year,Month,Day,Location,Event`
//! - `MODEL_PATH`, `LOCATION_ENCODER_PATH`, `EVENT_ENCODER_PATH` (optional)
//! - `GBDT_ITERATIONS`, `GBDT_MAX_DEPTH`, `GBDT_SHRINKAGE` (optional)
//! - `TEST_SIZE`, `SPLIT_SEED` (optional)
use anyhow::{Context, Result};
use dotenvy::dotenv;

use event_advisor::{config, telemetry, training};

fn main() -> Result<()> {
    // ---
    dotenv().ok();
    telemetry::init_tracing();

    let cfg = config::load_training_from_env()?;
    cfg.log_config();

    match training::run(&cfg).with_context(|| format!("Training from '{}' failed", cfg.csv_path))? {
        Some(report) => tracing::info!("Held-out accuracy {:.2}%", report.accuracy * 100.0),
        None => tracing::warn!("TEST_SIZE left no held-out rows, model was not evaluated"),
    }

    Ok(())
}
