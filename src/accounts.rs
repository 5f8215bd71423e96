//! Account and session store backed by SQLite.
//!
//! Passwords are stored as `salt$blake3(salt || password)`. That keeps raw
//! passwords out of the table and nothing more: blake3 is a fast hash, not a
//! password KDF, so a leaked table is cheap to brute-force offline.
//!
//! Sessions are random UUID tokens handed to the browser in the `session`
//! cookie. A token stops working [`SESSION_TTL_SECS`] after login, and stale
//! rows are purged whenever a new session starts.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

// ---

/// Lifetime of a login session.
pub const SESSION_TTL_SECS: i64 = 24 * 60 * 60;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("username already exists")]
    Duplicate,

    #[error("{0} must not be empty")]
    MissingField(&'static str),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Create a new account. Fails with [`AccountError::Duplicate`] when the
/// username is taken; no row is written in that case.
pub async fn signup(pool: &SqlitePool, username: &str, password: &str) -> Result<(), AccountError> {
    // ---
    let username = username.trim();
    if username.is_empty() {
        return Err(AccountError::MissingField("username"));
    }
    if password.is_empty() {
        return Err(AccountError::MissingField("password"));
    }

    let result = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
        .bind(username)
        .bind(hash_password(password))
        .execute(pool)
        .await;

    match result {
        Ok(_) => {
            info!(username, "account created");
            Ok(())
        }
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            debug!(username, "signup rejected, username taken");
            Err(AccountError::Duplicate)
        }
        Err(e) => Err(e.into()),
    }
}

/// True when `username` exists and `password` matches it.
pub async fn verify_login(pool: &SqlitePool, username: &str, password: &str) -> Result<bool, AccountError> {
    // ---
    let stored: Option<String> = sqlx::query_scalar("SELECT password FROM users WHERE username = ?")
        .bind(username.trim())
        .fetch_optional(pool)
        .await?;

    Ok(stored.is_some_and(|hash| verify_password(password, &hash)))
}

/// Start a session for `username` and return its token. Expired sessions
/// of any user are removed first.
pub async fn create_session(pool: &SqlitePool, username: &str) -> Result<String, AccountError> {
    // ---
    let now = Utc::now();
    purge_expired_sessions(pool, now).await?;

    let token = Uuid::new_v4().to_string();
    sqlx::query("INSERT INTO sessions (token, username, created_at) VALUES (?, ?, ?)")
        .bind(&token)
        .bind(username.trim())
        .bind(now.timestamp())
        .execute(pool)
        .await?;
    Ok(token)
}

/// Username owning the session `token`, if it is still active.
pub async fn session_user(pool: &SqlitePool, token: &str) -> Result<Option<String>, AccountError> {
    session_user_at(pool, token, Utc::now()).await
}

async fn session_user_at(
    pool: &SqlitePool,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<String>, AccountError> {
    Ok(
        sqlx::query_scalar("SELECT username FROM sessions WHERE token = ? AND created_at > ?")
            .bind(token)
            .bind(now.timestamp() - SESSION_TTL_SECS)
            .fetch_optional(pool)
            .await?,
    )
}

/// Delete sessions older than [`SESSION_TTL_SECS`] as of `now`.
pub async fn purge_expired_sessions(pool: &SqlitePool, now: DateTime<Utc>) -> Result<u64, AccountError> {
    // ---
    let removed = sqlx::query("DELETE FROM sessions WHERE created_at <= ?")
        .bind(now.timestamp() - SESSION_TTL_SECS)
        .execute(pool)
        .await?
        .rows_affected();
    if removed > 0 {
        debug!(removed, "expired sessions purged");
    }
    Ok(removed)
}

pub async fn end_session(pool: &SqlitePool, token: &str) -> Result<(), AccountError> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

// ---

fn hash_password(password: &str) -> String {
    // ---
    let salt = Uuid::new_v4().simple().to_string();
    let hash = digest(&salt, password);
    format!("{}${}", salt, hash.to_hex())
}

fn verify_password(password: &str, stored: &str) -> bool {
    // ---
    let Some((salt, hex)) = stored.split_once('$') else {
        return false;
    };
    match blake3::Hash::from_hex(hex) {
        // blake3::Hash equality is constant-time
        Ok(expected) => digest(salt, password) == expected,
        Err(_) => false,
    }
}

fn digest(salt: &str, password: &str) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hasher.finalize()
}
