use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::message;
use crate::error::AppResult;
use crate::services::chat::{self, ChatView, Conversation};
use crate::services::Caller;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Conversations of the caller, most recent first
pub async fn conversations(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<Conversation>>> {
    Ok(Json(chat::conversations(&state.db, claims.sub).await?))
}

/// Messages with one user plus the booking the caller could review them on
pub async fn chat_view(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ChatView>> {
    let caller = Caller::from(&claims);
    Ok(Json(chat::chat_view(&state.db, Some(&caller), user_id).await?))
}

pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> AppResult<(StatusCode, Json<message::Model>)> {
    let caller = Caller::from(&claims);
    let message = chat::send_message(&state.db, Some(&caller), user_id, &payload.content).await?;
    Ok((StatusCode::CREATED, Json(message)))
}
