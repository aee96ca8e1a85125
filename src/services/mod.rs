//! Domain operations behind the HTTP handlers.
//!
//! Every operation receives its database connection and, where identity
//! matters, an explicit [`Caller`] resolved once per request by the auth
//! middleware. Failures are reported as [`ServiceError`]; unexpected storage
//! errors are logged here and downgraded to [`ServiceError::StorageFailure`].

pub mod admin;
pub mod booking;
pub mod chat;
pub mod event;
pub mod profile;
pub mod review;

use sea_orm::{ColumnTrait, ConnectionTrait, DbErr, EntityTrait, QueryFilter, SqlErr};
use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::user::{self, UserRole};
use crate::utils::jwt::Claims;

/// Authenticated identity of the user issuing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub id: Uuid,
    pub role: UserRole,
}

impl From<&Claims> for Caller {
    fn from(claims: &Claims) -> Self {
        Caller {
            id: claims.sub,
            role: claims.role,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthenticated,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("You cannot book your own event")]
    SelfBookingForbidden,
    #[error("You have already booked this event")]
    DuplicateBooking,
    #[error("You are not part of this booking")]
    NotAParticipant,
    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(i32),
    #[error("You have already reviewed this booking")]
    DuplicateReview,
    #[error("{0}")]
    Validation(String),
    #[error("Storage operation failed")]
    StorageFailure,
}

impl From<DbErr> for ServiceError {
    fn from(err: DbErr) -> Self {
        tracing::error!(error = %err, "Storage operation failed");
        ServiceError::StorageFailure
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

pub(crate) fn require_caller(caller: Option<&Caller>) -> ServiceResult<&Caller> {
    caller.ok_or(ServiceError::Unauthenticated)
}

/// Maps a unique-index violation to `on_conflict`, anything else to a storage failure.
pub(crate) fn unique_violation_as(err: DbErr, on_conflict: ServiceError) -> ServiceError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => on_conflict,
        _ => err.into(),
    }
}

/// Public identity of a user shown next to bookings, events, reviews and messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub name: Option<String>,
    pub profile_pic: Option<String>,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        UserSummary {
            id: user.id,
            name: user.name.clone(),
            profile_pic: user.profile_pic.clone(),
        }
    }
}

/// Loads the given users keyed by id. Unknown ids are simply absent.
pub(crate) async fn load_users<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = Uuid>,
) -> ServiceResult<HashMap<Uuid, user::Model>> {
    let mut ids: Vec<Uuid> = ids.into_iter().collect();
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HashMap::new());
    }

    let users = user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?;

    Ok(users.into_iter().map(|u| (u.id, u)).collect())
}
