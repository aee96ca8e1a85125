use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::user;
use crate::error::AppResult;
use crate::services::admin::{self, UserFilter};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct VerifyUserRequest {
    pub is_verified: bool,
}

/// List users with optional location, gender and age filters (admin)
pub async fn list_users(
    State(state): State<AppState>,
    Query(filter): Query<UserFilter>,
) -> AppResult<Json<Vec<user::Model>>> {
    let today = Utc::now().date_naive();
    Ok(Json(admin::list_users(&state.db, &filter, today).await?))
}

/// Set or clear a user's verified flag (admin)
pub async fn verify_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<VerifyUserRequest>,
) -> AppResult<Json<user::Model>> {
    Ok(Json(admin::verify_user(&state.db, user_id, payload.is_verified).await?))
}
