use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::entities::user;
use crate::error::AppResult;
use crate::services::profile::{self, ProfileUpdate};
use crate::services::review::{self, ReviewSummary};
use crate::services::Caller;
use crate::utils::jwt::Claims;
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user: user::Model,
    pub reviews: ReviewSummary,
}

/// The caller's profile together with the reviews they received
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<ProfileResponse>> {
    let user = profile::get_profile(&state.db, claims.sub).await?;
    let reviews = review::user_reviews(&state.db, user.id).await?;
    Ok(Json(ProfileResponse { user, reviews }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ProfileUpdate>,
) -> AppResult<Json<user::Model>> {
    let caller = Caller::from(&claims);
    Ok(Json(profile::update_profile(&state.db, Some(&caller), payload).await?))
}
