//! Route gateway (EMBP): each sibling module exports a subrouter and this
//! module merges them and attaches the shared [`AppContext`].

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Router,
};

use crate::{views, AppContext};

mod health;
mod pages;
mod predict;
mod session;

pub use session::{session_token, SessionUser, SESSION_COOKIE};

// ---

pub fn router(ctx: AppContext) -> Router {
    // ---
    Router::new()
        .merge(pages::router())
        .merge(predict::router())
        .merge(health::router())
        .with_state(ctx)
}

/// HTML 500 page.
fn server_error(message: &str) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, Html(views::error_page(message))).into_response()
}
