use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::booking;
use crate::error::AppResult;
use crate::services::booking::{self as bookings, HostedEvent, UserBooking};
use crate::services::Caller;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub event_id: Uuid,
}

/// Book an event
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<(StatusCode, Json<booking::Model>)> {
    let caller = Caller::from(&claims);
    let booking = bookings::create_booking(&state.db, Some(&caller), payload.event_id).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// List the caller's bookings as a guest
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<UserBooking>>> {
    Ok(Json(bookings::user_bookings(&state.db, claims.sub).await?))
}

/// List events hosted by the caller with their guests
pub async fn hosted_events(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<HostedEvent>>> {
    Ok(Json(bookings::hosted_events(&state.db, claims.sub).await?))
}
