pub mod auth;
pub mod contacts;
pub mod error;
pub mod messages;
pub mod middleware;
pub mod session;

use axum::{
    Router,
    routing::{get, post},
};

pub use auth::{AppState, AppStateInner};
pub use session::SessionStore;

/// The full JSON surface. Everything except register/login/logout sits
/// behind the session-cookie middleware.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/add_contact", post(contacts::add_contact))
        .route("/remove_contact", post(contacts::remove_contact))
        .route("/get_contacts", get(contacts::get_contacts))
        .route("/send_message", post(messages::send_message))
        .route("/get_messages", get(messages::get_messages))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::require_session,
        ))
        .with_state(state);

    public.merge(protected)
}
