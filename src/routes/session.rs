//! Session cookie handling and the [`SessionUser`] extractor.

use axum::{
    extract::FromRequestParts,
    http::{header::COOKIE, request::Parts, HeaderMap},
    response::{IntoResponse, Redirect, Response},
};
use tracing::error;

use super::server_error;
use crate::accounts::SESSION_TTL_SECS;
use crate::{accounts, AppContext};

pub const SESSION_COOKIE: &str = "session";

// ---

/// Token from the `session` cookie, if the request carries one.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    // ---
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
}

pub(crate) fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_TTL_SECS}")
}

pub(crate) fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

/// Username behind the request's session, `None` when there is no valid one.
pub(crate) async fn current_user(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Result<Option<String>, accounts::AccountError> {
    // ---
    match session_token(headers) {
        Some(token) => accounts::session_user(&ctx.pool, &token).await,
        None => Ok(None),
    }
}

/// A logged-in user. Extracting it from a request without a valid session
/// redirects the browser to `/login`.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub username: String,
}

impl FromRequestParts<AppContext> for SessionUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, ctx: &AppContext) -> Result<Self, Self::Rejection> {
        // ---
        match current_user(ctx, &parts.headers).await {
            Ok(Some(username)) => Ok(SessionUser { username }),
            Ok(None) => Err(Redirect::to("/login").into_response()),
            Err(e) => {
                error!("Session lookup failed: {}", e);
                Err(server_error("Could not check your session."))
            }
        }
    }
}
