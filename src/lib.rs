//! `event-advisor`: predicts a likely event for a date and location and
//! attaches fixed safety guidance to the prediction.
//!
//! The crate is split along the Explicit Module Boundary Pattern (EMBP):
//! - `catalog` / `resolver` – static advisories and the label lookup policy
//! - `gateway` – the trained classifier behind the [`EventPredictor`] trait
//! - `accounts` / `schema` – SQLite users and sessions
//! - `routes` / `views` – the axum router and the HTML it renders
//! - `training` – the offline pipeline used by the `train-model` binary
//!
//! Binaries construct an [`AppContext`] once and hand it to [`routes::router`].

use std::sync::Arc;

use sqlx::SqlitePool;

pub mod accounts;
pub mod catalog;
pub mod config;
pub mod gateway;
pub mod models;
pub mod resolver;
pub mod routes;
pub mod schema;
pub mod telemetry;
pub mod training;
pub mod views;

pub use catalog::{Advisory, AdvisoryCatalog, Severity};
pub use config::Config;
pub use gateway::{EventPredictor, GatewayError};
pub use models::{InputError, PredictionForm, PredictionRequest, PredictionView};
pub use resolver::{LabelResolver, Resolution};

// ---

/// Everything a request handler needs, built once at startup.
///
/// The classifier and catalog are immutable for the life of the process and
/// shared behind `Arc`s, so cloning the context per request is cheap.
#[derive(Clone)]
pub struct AppContext {
    // ---
    pub pool: SqlitePool,
    pub predictor: Arc<dyn EventPredictor>,
    pub catalog: Arc<AdvisoryCatalog>,
}

impl AppContext {
    pub fn new(pool: SqlitePool, predictor: Arc<dyn EventPredictor>) -> Self {
        Self {
            pool,
            predictor,
            catalog: Arc::new(AdvisoryCatalog::new()),
        }
    }

    pub fn resolver(&self) -> LabelResolver<'_> {
        LabelResolver::new(&self.catalog)
    }
}
