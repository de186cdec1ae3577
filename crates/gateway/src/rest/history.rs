//! Chat history endpoint.
//!
//! Read-only view over the persisted message log, gated by the same
//! authenticator and participant guard as the live socket.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use pourpal_database::ChatMessageWithSender;
use pourpal_users::identity::display_name;

use crate::error::{ErrorBody, GatewayError, GatewayResult};
use crate::middleware::session_token_from_headers;
use crate::state::GatewayState;

#[derive(Debug, Serialize, ToSchema)]
pub struct ChatHistoryEntry {
    pub id: i64,
    pub hangout_id: i64,
    pub user_id: i64,
    pub user_name: String,
    pub user_photo: Option<String>,
    pub message_text: String,
    pub timestamp: String,
}

impl From<ChatMessageWithSender> for ChatHistoryEntry {
    fn from(message: ChatMessageWithSender) -> Self {
        Self {
            id: message.id,
            hangout_id: message.hangout_id,
            user_id: message.user_id,
            user_name: display_name(message.sender_first_name.as_deref(), &message.sender_email),
            user_photo: message.sender_photo_url,
            message_text: message.message_text,
            timestamp: message.created_at,
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/chat/{hangout_id}/messages",
    tag = "chat",
    params(("hangout_id" = i64, Path, description = "Hangout id")),
    responses(
        (status = 200, description = "Messages oldest first", body = [ChatHistoryEntry]),
        (status = 401, description = "No valid session", body = ErrorBody),
        (status = 403, description = "Not a participant", body = ErrorBody),
    )
)]
pub async fn list_messages(
    State(state): State<Arc<GatewayState>>,
    Path(hangout_id): Path<i64>,
    headers: HeaderMap,
) -> GatewayResult<Json<Vec<ChatHistoryEntry>>> {
    let token = session_token_from_headers(&headers, &state.session_cookie);
    let identity = state
        .authenticator
        .resolve(token.as_deref())
        .await
        .identity()
        .ok_or_else(|| {
            GatewayError::AuthenticationFailed("missing or invalid session".to_string())
        })?;

    if !state.guard.authorize(identity.user_id, hangout_id).await {
        return Err(GatewayError::Forbidden(
            "You must be a participant to view this chat.".to_string(),
        ));
    }

    let history = state.chat_service.history(hangout_id).await?;

    Ok(Json(history.into_iter().map(ChatHistoryEntry::from).collect()))
}
