//! Configuration loader for the `event-advisor` service and its trainer.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). By consolidating configuration logic here, we
//! avoid scattering `env::var` calls throughout the codebase.
use std::env;
use std::net::SocketAddr;

use anyhow::{anyhow, Result};

use crate::gateway::BoosterParams;

/// Parse an optional environment variable of type `$ty` with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

/// Read an optional string environment variable with a default value.
macro_rules! env_or {
    ($var_name:expr, $default:expr) => {
        env::var($var_name).unwrap_or_else(|_| $default.to_string())
    };
}

pub const DEFAULT_MODEL_PATH: &str = "event_model.json";
pub const DEFAULT_LOCATION_ENCODER_PATH: &str = "location_encoder.json";
pub const DEFAULT_EVENT_ENCODER_PATH: &str = "event_encoder.json";

/// Where the three model artifacts live.
#[derive(Debug, Clone)]
pub struct ArtifactPaths {
    // ---
    pub model: String,
    pub location_encoder: String,
    pub event_encoder: String,
}

impl ArtifactPaths {
    fn from_env() -> Self {
        Self {
            model: env_or!("MODEL_PATH", DEFAULT_MODEL_PATH),
            location_encoder: env_or!("LOCATION_ENCODER_PATH", DEFAULT_LOCATION_ENCODER_PATH),
            event_encoder: env_or!("EVENT_ENCODER_PATH", DEFAULT_EVENT_ENCODER_PATH),
        }
    }
}

/// Strongly typed server configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// SQLite connection string.
    pub db_url: String,

    /// Maximum number of database connections in the pool.
    pub db_pool_max: u32,

    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Trained model and encoder files.
    pub artifacts: ArtifactPaths,
}

/// Load server configuration from environment variables with defaults.
///
/// Optional:
/// - `DATABASE_URL` – SQLite connection string (default: `sqlite://users.db?mode=rwc`)
/// - `DB_POOL_MAX` – max DB connections (default: 5)
/// - `BIND_ADDR` – listen address (default: `0.0.0.0:8080`)
/// - `MODEL_PATH`, `LOCATION_ENCODER_PATH`, `EVENT_ENCODER_PATH` – artifact files
///
/// Returns an error if any variable is present but invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let db_url = env_or!("DATABASE_URL", "sqlite://users.db?mode=rwc");
    let db_pool_max = parse_env!("DB_POOL_MAX", u32, 5);
    let bind_addr = parse_env!("BIND_ADDR", SocketAddr, SocketAddr::from(([0, 0, 0, 0], 8080)));

    Ok(Config {
        db_url,
        db_pool_max,
        bind_addr,
        artifacts: ArtifactPaths::from_env(),
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  DATABASE_URL          : {}", self.db_url);
        tracing::info!("  DB_POOL_MAX           : {}", self.db_pool_max);
        tracing::info!("  BIND_ADDR             : {}", self.bind_addr);
        tracing::info!("  MODEL_PATH            : {}", self.artifacts.model);
        tracing::info!("  LOCATION_ENCODER_PATH : {}", self.artifacts.location_encoder);
        tracing::info!("  EVENT_ENCODER_PATH    : {}", self.artifacts.event_encoder);
    }
}

// ---

/// Configuration for the `train-model` binary.
#[derive(Debug, Clone)]
pub struct TrainingConfig {
    // ---
    /// CSV with `Year,Month,Day,Location,Event` columns.
    pub csv_path: String,

    /// Output files.
    pub artifacts: ArtifactPaths,

    pub params: BoosterParams,

    /// Fraction of each class held out for evaluation.
    pub test_size: f64,

    /// Seed for the train/test shuffle.
    pub split_seed: u64,
}

/// Load trainer configuration.
///
/// Required:
/// - `TRAINING_CSV` – path of the historical events CSV
///
/// Optional:
/// - `GBDT_ITERATIONS` (400), `GBDT_MAX_DEPTH` (8), `GBDT_SHRINKAGE` (0.05)
/// - `TEST_SIZE` (0.2), `SPLIT_SEED` (42)
/// - artifact paths as for the server
pub fn load_training_from_env() -> Result<TrainingConfig> {
    // ---
    let csv_path = require_env!("TRAINING_CSV");
    let defaults = BoosterParams::default();
    let params = BoosterParams {
        iterations: parse_env!("GBDT_ITERATIONS", usize, defaults.iterations),
        max_depth: parse_env!("GBDT_MAX_DEPTH", u32, defaults.max_depth),
        shrinkage: parse_env!("GBDT_SHRINKAGE", f32, defaults.shrinkage),
    };
    let test_size = parse_env!("TEST_SIZE", f64, 0.2);
    if !(0.0..1.0).contains(&test_size) {
        return Err(anyhow!("Invalid TEST_SIZE: {} (expected 0.0 <= x < 1.0)", test_size));
    }
    let split_seed = parse_env!("SPLIT_SEED", u64, 42);

    Ok(TrainingConfig {
        csv_path,
        artifacts: ArtifactPaths::from_env(),
        params,
        test_size,
        split_seed,
    })
}

impl TrainingConfig {
    pub fn log_config(&self) {
        // ---
        tracing::info!("Training configuration loaded:");
        tracing::info!("  TRAINING_CSV    : {}", self.csv_path);
        tracing::info!("  MODEL_PATH      : {}", self.artifacts.model);
        tracing::info!("  GBDT_ITERATIONS : {}", self.params.iterations);
        tracing::info!("  GBDT_MAX_DEPTH  : {}", self.params.max_depth);
        tracing::info!("  GBDT_SHRINKAGE  : {}", self.params.shrinkage);
        tracing::info!("  TEST_SIZE       : {}", self.test_size);
        tracing::info!("  SPLIT_SEED      : {}", self.split_seed);
    }
}
