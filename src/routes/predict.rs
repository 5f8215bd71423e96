//! Prediction endpoints: the `/index` form flow and its JSON twin.
//!
//! Both run the same pipeline: parse input, ask the gateway for a label,
//! resolve the label to an advisory, render.

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        State,
    },
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error, info};

use super::server_error;
use super::session::{current_user, SessionUser};
use crate::views::{self, Notice};
use crate::{AppContext, GatewayError, InputError, PredictionForm, PredictionRequest, PredictionView};

// ---

pub fn router() -> Router<AppContext> {
    // ---
    Router::new()
        .route("/index", get(index_form).post(index_submit))
        .route("/api/predict", post(api_predict))
        .route("/api/locations", get(api_locations))
}

#[derive(Debug, Error)]
enum PredictError {
    #[error("{0}")]
    Input(#[from] InputError),

    #[error("{0}")]
    Gateway(#[from] GatewayError),
}

impl PredictError {
    /// Gateway rejections of a location are still the caller's fault.
    fn is_client_error(&self) -> bool {
        matches!(
            self,
            PredictError::Input(_) | PredictError::Gateway(GatewayError::UnknownLocation(_))
        )
    }
}

/// parse -> gateway -> resolver -> view
fn run_prediction(ctx: &AppContext, form: &PredictionForm) -> Result<PredictionView, PredictError> {
    // ---
    let locations = ctx.predictor.locations();
    let request = PredictionRequest::from_form(form, locations)?;
    debug!(?request, "prediction request parsed");

    let label = ctx.predictor.predict(&request)?;
    let advisory = ctx.resolver().resolve(&label);
    info!(
        location = request.location(),
        year = request.year(),
        month = request.month(),
        day = request.day(),
        %label,
        "prediction served"
    );

    Ok(PredictionView::new(label, advisory, locations))
}

async fn index_form(user: SessionUser, State(ctx): State<AppContext>) -> Html<String> {
    Html(views::index_page(&user.username, ctx.predictor.locations(), None, None))
}

async fn index_submit(
    user: SessionUser,
    State(ctx): State<AppContext>,
    form: Result<Form<PredictionForm>, FormRejection>,
) -> Response {
    // ---
    let locations = ctx.predictor.locations();
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            debug!("Rejected prediction form: {}", rejection.body_text());
            return unsupported_input(&user, locations, "date and location are required");
        }
    };

    match run_prediction(&ctx, &form) {
        Ok(view) => Html(views::index_page(&user.username, locations, Some(&view), None)).into_response(),
        Err(e) if e.is_client_error() => {
            debug!("Rejected prediction input: {}", e);
            unsupported_input(&user, locations, &e.to_string())
        }
        Err(e) => {
            error!("Prediction failed: {}", e);
            server_error("Prediction failed, please try again later.")
        }
    }
}

/// 400 with the form re-rendered above an "Unsupported input" notice.
fn unsupported_input(user: &SessionUser, locations: &[String], reason: &str) -> Response {
    // ---
    let message = format!("Unsupported input: {}", reason);
    (
        StatusCode::BAD_REQUEST,
        Html(views::index_page(
            &user.username,
            locations,
            None,
            Some(Notice::Danger(&message)),
        )),
    )
        .into_response()
}

async fn api_predict(
    State(ctx): State<AppContext>,
    headers: HeaderMap,
    body: Result<Json<PredictionForm>, JsonRejection>,
) -> Response {
    // ---
    match current_user(&ctx, &headers).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (StatusCode::UNAUTHORIZED, Json(json!({ "error": "login required" }))).into_response();
        }
        Err(e) => {
            error!("Session lookup failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "session lookup failed" })),
            )
                .into_response();
        }
    }

    // Body errors only surface once the caller is logged in
    let form = match body {
        Ok(Json(form)) => form,
        Err(rejection) => {
            debug!("Rejected prediction body: {}", rejection.body_text());
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": rejection.body_text() })),
            )
                .into_response();
        }
    };

    match run_prediction(&ctx, &form) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) if e.is_client_error() => {
            (StatusCode::BAD_REQUEST, Json(json!({ "error": e.to_string() }))).into_response()
        }
        Err(e) => {
            error!("Prediction failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "prediction failed" })),
            )
                .into_response()
        }
    }
}

async fn api_locations(State(ctx): State<AppContext>) -> Json<Vec<String>> {
    Json(ctx.predictor.locations().to_vec())
}
