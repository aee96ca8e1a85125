use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::entities::event;
use crate::error::AppResult;
use crate::services::event::{self as events, EventFilter, EventWithHost, NewEvent};
use crate::services::Caller;
use crate::utils::jwt::Claims;
use crate::AppState;

/// Browse and search events
pub async fn list_events(
    State(state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> AppResult<Json<Vec<EventWithHost>>> {
    Ok(Json(events::search_events(&state.db, &filter).await?))
}

/// Get event details with its host
pub async fn get_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<EventWithHost>> {
    Ok(Json(events::get_event(&state.db, event_id).await?))
}

/// Host a new event
pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<NewEvent>,
) -> AppResult<(StatusCode, Json<event::Model>)> {
    let caller = Caller::from(&claims);
    let event = events::create_event(&state.db, Some(&caller), payload).await?;
    Ok((StatusCode::CREATED, Json(event)))
}
