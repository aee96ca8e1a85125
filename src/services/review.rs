use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;
use std::collections::HashSet;
use uuid::Uuid;

use super::{
    load_users, require_caller, unique_violation_as, Caller, ServiceError, ServiceResult,
    UserSummary,
};
use crate::entities::{booking, event, review};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

/// The other party on a booking: the host when `reviewer_id` is the guest,
/// the guest when `reviewer_id` is the host.
pub fn resolve_reviewee(guest_id: Uuid, host_id: Uuid, reviewer_id: Uuid) -> Option<Uuid> {
    if reviewer_id == guest_id {
        Some(host_id)
    } else if reviewer_id == host_id {
        Some(guest_id)
    } else {
        None
    }
}

/// Records a review by the caller on `booking_id`.
///
/// A second review by the same reviewer on the same booking is rejected by
/// the unique index and reported as [`ServiceError::DuplicateReview`].
pub async fn submit_review<C: ConnectionTrait>(
    db: &C,
    caller: Option<&Caller>,
    booking_id: Uuid,
    rating: i32,
    comment: Option<String>,
) -> ServiceResult<review::Model> {
    let caller = require_caller(caller)?;

    let (booking, event) = booking::Entity::find_by_id(booking_id)
        .find_also_related(event::Entity)
        .one(db)
        .await?
        .and_then(|(b, e)| e.map(|e| (b, e)))
        .ok_or(ServiceError::NotFound("Booking"))?;

    let reviewee_id = resolve_reviewee(booking.guest_id, event.host_id, caller.id)
        .ok_or(ServiceError::NotAParticipant)?;

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ServiceError::InvalidRating(rating));
    }

    let comment = comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty());

    let review = review::ActiveModel {
        id: Set(Uuid::new_v4()),
        booking_id: Set(booking.id),
        reviewer_id: Set(caller.id),
        reviewee_id: Set(reviewee_id),
        rating: Set(rating),
        comment: Set(comment),
        created_at: Set(Utc::now().into()),
    }
    .insert(db)
    .await
    .map_err(|e| unique_violation_as(e, ServiceError::DuplicateReview))?;

    tracing::info!(
        review_id = %review.id,
        booking_id = %booking.id,
        reviewer_id = %caller.id,
        reviewee_id = %reviewee_id,
        "Review submitted"
    );

    Ok(review)
}

#[derive(Debug, Serialize)]
pub struct ReceivedReview {
    #[serde(flatten)]
    pub review: review::Model,
    pub reviewer: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct ReviewSummary {
    pub reviews: Vec<ReceivedReview>,
    /// Mean rating with one decimal place, `"0"` without reviews.
    pub average: String,
    pub count: usize,
}

/// Mean rating to one decimal place, halves rounded up (`4.25` is `"4.3"`).
pub fn format_average(ratings: &[i32]) -> String {
    if ratings.is_empty() {
        return "0".to_string();
    }
    let total: i64 = ratings.iter().map(|&r| i64::from(r)).sum();
    let n = ratings.len() as i64;
    let tenths = (20 * total + n) / (2 * n);
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// Reviews received by `user_id`, newest first, with aggregate stats.
pub async fn user_reviews<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ServiceResult<ReviewSummary> {
    let reviews = review::Entity::find()
        .filter(review::Column::RevieweeId.eq(user_id))
        .order_by_desc(review::Column::CreatedAt)
        .all(db)
        .await?;

    let ratings: Vec<i32> = reviews.iter().map(|r| r.rating).collect();
    let reviewers = load_users(db, reviews.iter().map(|r| r.reviewer_id)).await?;

    let reviews: Vec<ReceivedReview> = reviews
        .into_iter()
        .filter_map(|r| {
            let reviewer = UserSummary::from(reviewers.get(&r.reviewer_id)?);
            Some(ReceivedReview {
                review: r,
                reviewer,
            })
        })
        .collect();

    Ok(ReviewSummary {
        count: ratings.len(),
        average: format_average(&ratings),
        reviews,
    })
}

/// An approved booking between `reviewer_id` and `counterpart_id`, in
/// either role, that `reviewer_id` has not reviewed yet.
pub async fn reviewable_booking<C: ConnectionTrait>(
    db: &C,
    reviewer_id: Uuid,
    counterpart_id: Uuid,
) -> ServiceResult<Option<Uuid>> {
    let candidates = booking::Entity::find()
        .inner_join(event::Entity)
        .filter(booking::Column::Status.eq(booking::BookingStatus::Approved))
        .filter(
            Condition::any()
                .add(
                    Condition::all()
                        .add(booking::Column::GuestId.eq(reviewer_id))
                        .add(event::Column::HostId.eq(counterpart_id)),
                )
                .add(
                    Condition::all()
                        .add(booking::Column::GuestId.eq(counterpart_id))
                        .add(event::Column::HostId.eq(reviewer_id)),
                ),
        )
        .order_by_asc(booking::Column::CreatedAt)
        .all(db)
        .await?;

    if candidates.is_empty() {
        return Ok(None);
    }

    let reviewed: HashSet<Uuid> = review::Entity::find()
        .filter(review::Column::ReviewerId.eq(reviewer_id))
        .filter(review::Column::BookingId.is_in(candidates.iter().map(|b| b.id)))
        .all(db)
        .await?
        .into_iter()
        .map(|r| r.booking_id)
        .collect();

    Ok(candidates
        .into_iter()
        .map(|b| b.id)
        .find(|id| !reviewed.contains(id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reviewee_is_the_other_party() {
        let guest = Uuid::new_v4();
        let host = Uuid::new_v4();

        assert_eq!(resolve_reviewee(guest, host, guest), Some(host));
        assert_eq!(resolve_reviewee(guest, host, host), Some(guest));
        assert_eq!(resolve_reviewee(guest, host, Uuid::new_v4()), None);
    }

    #[test]
    fn average_of_no_ratings_is_zero() {
        assert_eq!(format_average(&[]), "0");
    }

    #[test]
    fn average_has_one_decimal() {
        assert_eq!(format_average(&[5]), "5.0");
        assert_eq!(format_average(&[4, 5]), "4.5");
        assert_eq!(format_average(&[1, 2, 2]), "1.7");
    }

    #[test]
    fn average_rounds_halves_up() {
        assert_eq!(format_average(&[4, 4, 4, 5]), "4.3");
        assert_eq!(format_average(&[1, 1, 1, 2]), "1.3");
        assert_eq!(format_average(&[2, 3, 3, 3]), "2.8");
    }

    #[test]
    fn average_ignores_order() {
        assert_eq!(format_average(&[3, 5, 4, 1]), format_average(&[1, 4, 5, 3]));
    }
}
