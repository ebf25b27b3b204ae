use anyhow::anyhow;
use axum::{Extension, Json, extract::State, response::IntoResponse};

use palaver_types::api::{ApiResponse, ContactRequest, ContactsResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

pub async fn add_contact(
    State(state): State<AppState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = req.contact.trim().to_string();

    if contact.is_empty() {
        return Err(ApiError::Validation("enter a username".into()));
    }
    if contact == owner {
        return Err(ApiError::SelfReference);
    }

    let db = state.clone();
    let added = tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
        if !db.db.user_exists(&contact)? {
            return Ok(false);
        }
        // INSERT OR IGNORE underneath: re-adding an edge is a no-op success
        db.db.add_contact(&owner, &contact)?;
        Ok(true)
    })
    .await
    .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    if !added {
        return Err(ApiError::UnknownUser);
    }

    Ok(Json(ApiResponse::ok()))
}

pub async fn remove_contact(
    State(state): State<AppState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
    Json(req): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let contact = req.contact.trim().to_string();

    let db = state.clone();
    tokio::task::spawn_blocking(move || db.db.remove_contact(&owner, &contact))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    Ok(Json(ApiResponse::ok()))
}

pub async fn get_contacts(
    State(state): State<AppState>,
    Extension(CurrentUser(owner)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let contacts = tokio::task::spawn_blocking(move || db.db.list_contacts(&owner))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    Ok(Json(ContactsResponse { contacts }))
}
