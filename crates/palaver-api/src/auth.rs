use std::sync::Arc;

use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use tracing::info;

use palaver_db::Database;
use palaver_types::api::{ApiResponse, LoginRequest, RegisterRequest};

use crate::error::ApiError;
use crate::middleware::SESSION_COOKIE;
use crate::session::SessionStore;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub sessions: SessionStore,
}

/// Passwords are 4-digit PINs by product rule. Deliberately weak; the
/// format check is the contract here, not a security recommendation.
fn valid_pin(password: &str) -> bool {
    password.len() == 4 && password.bytes().all(|b| b.is_ascii_digit())
}

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_string();
    let password = req.password.trim().to_string();

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::Validation("fill in both fields".into()));
    }
    if !valid_pin(&password) {
        return Err(ApiError::Validation("password must be exactly 4 digits".into()));
    }

    // Salted slow hash rather than a bare digest of the PIN
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?
        .to_string();

    // Uniqueness is decided by the store itself, atomically
    let db = state.clone();
    let name = username.clone();
    let inserted = tokio::task::spawn_blocking(move || db.db.create_user(&name, &password_hash))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    if !inserted {
        return Err(ApiError::AlreadyExists);
    }

    info!("registered user {username}");
    Ok((StatusCode::CREATED, Json(ApiResponse::ok_with("registration successful"))))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let username = req.username.trim().to_string();
    let password = req.password.trim().to_string();

    let db = state.clone();
    let name = username.clone();
    let user = tokio::task::spawn_blocking(move || db.db.get_user(&name))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??
        .ok_or(ApiError::InvalidCredentials)?;

    let parsed_hash =
        PasswordHash::new(&user.password).map_err(|e| anyhow!("stored hash is corrupt: {e}"))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;

    let token = state.sessions.create(&username);

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    info!("user {username} logged in");
    Ok((jar.add(cookie), Json(ApiResponse::ok())))
}

/// Logout never fails. Clearing an absent or stale session is a no-op.
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        state.sessions.remove(cookie.value());
    }

    let removal = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (jar.remove(removal), Json(ApiResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::valid_pin;

    #[test]
    fn pin_must_be_four_ascii_digits() {
        assert!(valid_pin("1234"));
        assert!(valid_pin("0000"));
        assert!(!valid_pin("123"));
        assert!(!valid_pin("12345"));
        assert!(!valid_pin("12a4"));
        assert!(!valid_pin("١٢٣٤")); // non-ASCII digits
        assert!(!valid_pin(""));
    }
}
