//! Home, signup, login and logout pages.

use axum::{
    extract::{Query, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::server_error;
use super::session::{expired_session_cookie, session_cookie, session_token};
use crate::accounts::{self, AccountError};
use crate::views::{self, Notice};
use crate::AppContext;

const SIGNUP_OK: &str = "Signup successful! Please login.";
const SIGNUP_DUPLICATE: &str = "Username already exists. Try another.";
const SIGNUP_MISSING: &str = "Username and password are required.";
const LOGIN_FAILED: &str = "Invalid credentials. Try again.";

// ---

pub fn router() -> Router<AppContext> {
    // ---
    Router::new()
        .route("/", get(home))
        .route("/signup", get(signup_form).post(signup))
        .route("/login", get(login_form).post(login))
        .route("/logout", get(logout))
}

#[derive(Debug, Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginQuery {
    registered: Option<String>,
}

async fn home() -> Html<String> {
    Html(views::home_page())
}

async fn signup_form() -> Html<String> {
    Html(views::signup_page(None))
}

async fn signup(State(ctx): State<AppContext>, Form(creds): Form<Credentials>) -> Response {
    // ---
    match accounts::signup(&ctx.pool, &creds.username, &creds.password).await {
        Ok(()) => Redirect::to("/login?registered=1").into_response(),
        Err(AccountError::Duplicate) => (
            StatusCode::CONFLICT,
            Html(views::signup_page(Some(Notice::Danger(SIGNUP_DUPLICATE)))),
        )
            .into_response(),
        Err(AccountError::MissingField(_)) => (
            StatusCode::BAD_REQUEST,
            Html(views::signup_page(Some(Notice::Danger(SIGNUP_MISSING)))),
        )
            .into_response(),
        Err(e) => {
            error!("Signup failed: {}", e);
            server_error("Something went wrong, please try again.")
        }
    }
}

async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    let notice = query.registered.map(|_| Notice::Success(SIGNUP_OK));
    Html(views::login_page(notice))
}

async fn login(State(ctx): State<AppContext>, Form(creds): Form<Credentials>) -> Response {
    // ---
    let verified = match accounts::verify_login(&ctx.pool, &creds.username, &creds.password).await {
        Ok(v) => v,
        Err(e) => {
            error!("Login lookup failed: {}", e);
            return server_error("Something went wrong, please try again.");
        }
    };

    if !verified {
        warn!(username = %creds.username, "failed login");
        return (
            StatusCode::UNAUTHORIZED,
            Html(views::login_page(Some(Notice::Danger(LOGIN_FAILED)))),
        )
            .into_response();
    }

    match accounts::create_session(&ctx.pool, &creds.username).await {
        Ok(token) => {
            info!(username = %creds.username, "logged in");
            (
                [(SET_COOKIE, session_cookie(&token))],
                Redirect::to("/index"),
            )
                .into_response()
        }
        Err(e) => {
            error!("Could not create session: {}", e);
            server_error("Something went wrong, please try again.")
        }
    }
}

async fn logout(State(ctx): State<AppContext>, headers: HeaderMap) -> Response {
    // ---
    if let Some(token) = session_token(&headers) {
        if let Err(e) = accounts::end_session(&ctx.pool, &token).await {
            error!("Could not end session: {}", e);
        }
    }
    ([(SET_COOKIE, expired_session_cookie())], Redirect::to("/")).into_response()
}
