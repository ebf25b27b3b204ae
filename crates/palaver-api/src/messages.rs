use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::warn;

use palaver_types::api::{ApiResponse, MessageView, MessagesResponse, SendMessageRequest};
use palaver_types::models::conversation_key;

use crate::auth::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;

const SENT_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub contact: String,
}

/// Recipients must exist in the credential store; whether they are a
/// contact of the sender is not checked — contact edges gate the UI, not
/// the conversation store.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(CurrentUser(sender)): Extension<CurrentUser>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = req.recipient.trim().to_string();
    let text = req.text.trim().to_string();

    if text.is_empty() {
        return Err(ApiError::EmptyText);
    }
    if recipient.is_empty() {
        return Err(ApiError::Validation("no recipient given".into()));
    }

    let key = conversation_key(&sender, &recipient);
    let sent_at = chrono::Local::now().format(SENT_AT_FORMAT).to_string();

    let db = state.clone();
    let delivered = tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
        if !db.db.user_exists(&recipient)? {
            return Ok(false);
        }
        db.db.append_message(&key, &sender, &text, &sent_at)?;
        Ok(true)
    })
    .await
    .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    if !delivered {
        return Err(ApiError::UnknownRecipient);
    }

    Ok(Json(ApiResponse::ok()))
}

/// Full history for the pair on every call — the client polls and rerenders.
/// No conversation yet is an empty list, not an error.
pub async fn get_messages(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<MessageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let key = conversation_key(&user, query.contact.trim());

    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.conversation_messages(&key))
        .await
        .map_err(|e| anyhow!("spawn_blocking join error: {e}"))??;

    let messages = rows
        .into_iter()
        .map(|row| MessageView {
            sender: row.sender,
            text: row.text,
            time: clock_time(&row.sent_at),
        })
        .collect();

    Ok(Json(MessagesResponse { messages }))
}

/// Reduce a stored `YYYY-MM-DD HH:MM:SS` timestamp to the `HH:MM` the
/// client displays.
fn clock_time(sent_at: &str) -> String {
    match NaiveDateTime::parse_from_str(sent_at, SENT_AT_FORMAT) {
        Ok(dt) => dt.format("%H:%M").to_string(),
        Err(e) => {
            warn!("corrupt sent_at '{sent_at}': {e}");
            sent_at.get(11..16).unwrap_or_default().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::clock_time;

    #[test]
    fn clock_time_drops_date_and_seconds() {
        assert_eq!(clock_time("2026-08-29 09:05:33"), "09:05");
    }

    #[test]
    fn clock_time_survives_garbage() {
        assert_eq!(clock_time("not a timestamp"), "");
    }
}
