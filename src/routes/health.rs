//! Liveness endpoint.
//!
//! `GET /health` answers without touching the database, and reports how many
//! locations and advisories were loaded so a bad artifact deploy is visible
//! at a glance.

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppContext;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    locations: usize,
    advisories: usize,
}

async fn health(State(ctx): State<AppContext>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        locations: ctx.predictor.locations().len(),
        advisories: ctx.catalog.len(),
    })
}

pub fn router() -> Router<AppContext> {
    Router::new().route("/health", get(health))
}
