use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::review;
use crate::error::AppResult;
use crate::services::review::{self as reviews, ReviewSummary};
use crate::services::Caller;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub booking_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
}

/// Review the other party of a booking
pub async fn submit_review(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<review::Model>)> {
    let caller = Caller::from(&claims);
    let review = reviews::submit_review(
        &state.db,
        Some(&caller),
        payload.booking_id,
        payload.rating,
        payload.comment,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

/// Reviews received by a user, with average rating
pub async fn user_reviews(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ReviewSummary>> {
    Ok(Json(reviews::user_reviews(&state.db, user_id).await?))
}
