use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::AppState;
use crate::error::ApiError;

pub const SESSION_COOKIE: &str = "palaver_session";

/// The authenticated caller, inserted into request extensions by
/// [`require_session`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub String);

/// Resolve the session cookie to a username, or short-circuit with 401
/// before any store is touched.
pub async fn require_session(
    State(state): State<AppState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar.get(SESSION_COOKIE).ok_or(ApiError::Unauthorized)?;

    let username = state
        .sessions
        .authenticate(token.value())
        .ok_or(ApiError::Unauthorized)?;

    req.extensions_mut().insert(CurrentUser(username));
    Ok(next.run(req).await)
}
