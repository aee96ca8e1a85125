use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, Set};
use serde::Deserialize;
use uuid::Uuid;

use super::{require_caller, Caller, ServiceError, ServiceResult};
use crate::entities::user;

/// Partial profile update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub gender: Option<String>,
    pub dob: Option<NaiveDate>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub profile_pic: Option<String>,
    pub govt_id: Option<String>,
}

pub async fn get_profile<C: ConnectionTrait>(db: &C, user_id: Uuid) -> ServiceResult<user::Model> {
    user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("User"))
}

pub async fn update_profile<C: ConnectionTrait>(
    db: &C,
    caller: Option<&Caller>,
    update: ProfileUpdate,
) -> ServiceResult<user::Model> {
    let caller = require_caller(caller)?;

    if let Some(name) = &update.name {
        if name.trim().chars().count() < 2 {
            return Err(ServiceError::Validation(
                "Name must be at least 2 characters".to_string(),
            ));
        }
    }

    let user = get_profile(db, caller.id).await?;
    let mut active: user::ActiveModel = user.into();

    if let Some(name) = update.name {
        active.name = Set(Some(name.trim().to_string()));
    }
    if let Some(gender) = update.gender {
        active.gender = Set(Some(gender));
    }
    if let Some(dob) = update.dob {
        active.dob = Set(Some(dob));
    }
    if let Some(bio) = update.bio {
        active.bio = Set(Some(bio));
    }
    if let Some(location) = update.location {
        active.location = Set(Some(location));
    }
    if let Some(url) = update.profile_pic {
        active.profile_pic = Set(Some(url));
    }
    if let Some(url) = update.govt_id {
        active.govt_id = Set(Some(url));
    }

    Ok(active.update(db).await?)
}
