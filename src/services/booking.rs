use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use std::collections::HashMap;
use uuid::Uuid;

use super::{
    load_users, require_caller, unique_violation_as, Caller, ServiceError, ServiceResult,
    UserSummary,
};
use crate::entities::{booking, event, user};

/// Books `event_id` for the caller.
///
/// Checks run in a fixed order and the first failing one wins: identity,
/// event existence, self-booking, then an existing booking for the exact
/// (event, guest) pair. The unique index on that pair is the authoritative
/// guard; a concurrent insert that slips past the lookup surfaces as
/// [`ServiceError::DuplicateBooking`] as well.
pub async fn create_booking<C: ConnectionTrait>(
    db: &C,
    caller: Option<&Caller>,
    event_id: Uuid,
) -> ServiceResult<booking::Model> {
    let caller = require_caller(caller)?;

    let event = event::Entity::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("Event"))?;

    if event.host_id == caller.id {
        return Err(ServiceError::SelfBookingForbidden);
    }

    let existing = booking::Entity::find()
        .filter(booking::Column::EventId.eq(event.id))
        .filter(booking::Column::GuestId.eq(caller.id))
        .one(db)
        .await?;

    if existing.is_some() {
        return Err(ServiceError::DuplicateBooking);
    }

    let status = booking::BookingStatus::initial(event.auto_approve);
    let new_booking = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(event.id),
        guest_id: Set(caller.id),
        status: Set(status),
        created_at: Set(Utc::now().into()),
    };

    let booking = new_booking
        .insert(db)
        .await
        .map_err(|e| unique_violation_as(e, ServiceError::DuplicateBooking))?;

    tracing::info!(
        booking_id = %booking.id,
        event_id = %event.id,
        guest_id = %caller.id,
        status = ?booking.status,
        "Booking created"
    );

    Ok(booking)
}

#[derive(Debug, Serialize)]
pub struct GuestBooking {
    #[serde(flatten)]
    pub booking: booking::Model,
    pub guest: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct HostedEvent {
    #[serde(flatten)]
    pub event: event::Model,
    pub bookings: Vec<GuestBooking>,
}

/// Events hosted by `user_id`, latest date first, each with its bookings
/// (newest first) and the guest behind every booking.
pub async fn hosted_events<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ServiceResult<Vec<HostedEvent>> {
    let events = event::Entity::find()
        .filter(event::Column::HostId.eq(user_id))
        .order_by_desc(event::Column::Date)
        .all(db)
        .await?;

    if events.is_empty() {
        return Ok(Vec::new());
    }

    let bookings = booking::Entity::find()
        .filter(booking::Column::EventId.is_in(events.iter().map(|e| e.id)))
        .find_also_related(user::Entity)
        .order_by_desc(booking::Column::CreatedAt)
        .all(db)
        .await?;

    let mut by_event: HashMap<Uuid, Vec<GuestBooking>> = HashMap::new();
    for (b, guest) in bookings {
        let Some(guest) = guest else { continue };
        by_event.entry(b.event_id).or_default().push(GuestBooking {
            guest: UserSummary::from(&guest),
            booking: b,
        });
    }

    Ok(events
        .into_iter()
        .map(|e| HostedEvent {
            bookings: by_event.remove(&e.id).unwrap_or_default(),
            event: e,
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub struct BookedEvent {
    #[serde(flatten)]
    pub event: event::Model,
    pub host: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct UserBooking {
    #[serde(flatten)]
    pub booking: booking::Model,
    pub event: BookedEvent,
}

/// Bookings made by `user_id` as a guest, ordered by event date ascending.
pub async fn user_bookings<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
) -> ServiceResult<Vec<UserBooking>> {
    let rows = booking::Entity::find()
        .filter(booking::Column::GuestId.eq(user_id))
        .find_also_related(event::Entity)
        .order_by_asc(event::Column::Date)
        .all(db)
        .await?;

    let hosts = load_users(db, rows.iter().filter_map(|(_, e)| e.as_ref().map(|e| e.host_id)))
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|(b, e)| {
            let event = e?;
            let host = hosts.get(&event.host_id)?;
            Some(UserBooking {
                booking: b,
                event: BookedEvent {
                    host: UserSummary::from(host),
                    event,
                },
            })
        })
        .collect())
}
