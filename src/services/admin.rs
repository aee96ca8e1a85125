use chrono::{Months, NaiveDate};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use super::{ServiceError, ServiceResult};
use crate::entities::user;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilter {
    #[serde(alias = "loc")]
    pub location: Option<String>,
    pub gender: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
}

/// `date` shifted back by whole years, clamping Feb 29 to Feb 28.
pub fn years_before(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years.saturating_mul(12)))
        .unwrap_or(NaiveDate::MIN)
}

/// Inclusive/exclusive dob bounds for an age range as of `today`.
///
/// Someone is at least `min_age` when born on or before `today - min_age`
/// years, and at most `max_age` when born after `today - (max_age + 1)` years.
pub fn dob_bounds(
    today: NaiveDate,
    min_age: Option<u32>,
    max_age: Option<u32>,
) -> (Option<NaiveDate>, Option<NaiveDate>) {
    let born_on_or_before = min_age.map(|age| years_before(today, age));
    let born_after = max_age.map(|age| years_before(today, age.saturating_add(1)));
    (born_on_or_before, born_after)
}

/// Users matching `filter`, newest accounts first.
pub async fn list_users<C: ConnectionTrait>(
    db: &C,
    filter: &UserFilter,
    today: NaiveDate,
) -> ServiceResult<Vec<user::Model>> {
    let mut condition = Condition::all();

    if let Some(location) = filter.location.as_deref().map(str::trim).filter(|l| !l.is_empty()) {
        condition = condition.add(user::Column::Location.contains(location));
    }
    if let Some(gender) = filter.gender.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
        condition = condition.add(user::Column::Gender.eq(gender));
    }

    let (born_on_or_before, born_after) = dob_bounds(today, filter.min_age, filter.max_age);
    if let Some(date) = born_on_or_before {
        condition = condition.add(user::Column::Dob.lte(date));
    }
    if let Some(date) = born_after {
        condition = condition.add(user::Column::Dob.gt(date));
    }

    let users = user::Entity::find()
        .filter(condition)
        .order_by_desc(user::Column::CreatedAt)
        .all(db)
        .await?;

    Ok(users)
}

pub async fn verify_user<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    is_verified: bool,
) -> ServiceResult<user::Model> {
    let user = user::Entity::find_by_id(user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("User"))?;

    let mut active: user::ActiveModel = user.into();
    active.is_verified = Set(is_verified);
    let user = active.update(db).await?;

    tracing::info!(user_id = %user.id, is_verified, "User verification updated");
    Ok(user)
}
