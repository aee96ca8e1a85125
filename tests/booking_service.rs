mod common;

use chrono::{Duration, Utc};
use event_booking_backend::{
    entities::booking::{self, BookingStatus},
    services::{booking as bookings, ServiceError},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set, SqlErr};
use uuid::Uuid;

use common::{caller, create_user, host_event, host_event_on, setup_db, tick};

#[tokio::test]
async fn host_cannot_book_own_event() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let event = host_event(&db, &host, true).await;

    let err = bookings::create_booking(&db, Some(&caller(&host)), event.id)
        .await
        .unwrap_err();

    assert_eq!(err, ServiceError::SelfBookingForbidden);
}

#[tokio::test]
async fn second_booking_for_same_event_is_a_duplicate() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;
    let event = host_event(&db, &host, true).await;

    let first = bookings::create_booking(&db, Some(&caller(&guest)), event.id).await;
    assert!(first.is_ok());

    let second = bookings::create_booking(&db, Some(&caller(&guest)), event.id).await;
    assert_eq!(second.unwrap_err(), ServiceError::DuplicateBooking);

    let count = booking::Entity::find()
        .filter(booking::Column::EventId.eq(event.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn duplicate_check_is_per_event_and_guest() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;
    let first = host_event(&db, &host, true).await;
    let second = host_event(&db, &host, true).await;

    bookings::create_booking(&db, Some(&caller(&alice)), first.id).await.unwrap();
    bookings::create_booking(&db, Some(&caller(&alice)), second.id).await.unwrap();
    bookings::create_booking(&db, Some(&caller(&bob)), first.id).await.unwrap();
}

#[tokio::test]
async fn status_follows_auto_approve() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;
    let open = host_event(&db, &host, true).await;
    let curated = host_event(&db, &host, false).await;

    let approved = bookings::create_booking(&db, Some(&caller(&guest)), open.id).await.unwrap();
    let pending = bookings::create_booking(&db, Some(&caller(&guest)), curated.id).await.unwrap();

    assert_eq!(approved.status, BookingStatus::Approved);
    assert_eq!(pending.status, BookingStatus::Pending);
    assert_eq!(pending.guest_id, guest.id);
    assert_eq!(pending.event_id, curated.id);
}

#[tokio::test]
async fn booking_requires_caller_and_existing_event() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;
    let event = host_event(&db, &host, true).await;

    let err = bookings::create_booking(&db, None, event.id).await.unwrap_err();
    assert_eq!(err, ServiceError::Unauthenticated);

    let err = bookings::create_booking(&db, Some(&caller(&guest)), Uuid::new_v4())
        .await
        .unwrap_err();
    assert_eq!(err, ServiceError::NotFound("Event"));
}

#[tokio::test]
async fn store_rejects_duplicate_booking_rows() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;
    let event = host_event(&db, &host, true).await;

    bookings::create_booking(&db, Some(&caller(&guest)), event.id).await.unwrap();

    // Simulates a concurrent request that passed the existence check
    let raced = booking::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(event.id),
        guest_id: Set(guest.id),
        status: Set(BookingStatus::Approved),
        created_at: Set(Utc::now().into()),
    }
    .insert(&db)
    .await
    .unwrap_err();

    assert!(matches!(raced.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))));
}

#[tokio::test]
async fn hosted_events_list_guests_newest_first() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let alice = create_user(&db, "alice").await;
    let bob = create_user(&db, "bob").await;

    let soon = host_event_on(&db, &host, "Soon", true, Utc::now() + Duration::days(1)).await;
    let later = host_event_on(&db, &host, "Later", false, Utc::now() + Duration::days(30)).await;

    bookings::create_booking(&db, Some(&caller(&alice)), soon.id).await.unwrap();
    tick().await;
    bookings::create_booking(&db, Some(&caller(&bob)), soon.id).await.unwrap();

    let hosted = bookings::hosted_events(&db, host.id).await.unwrap();

    let names: Vec<_> = hosted.iter().map(|h| h.event.name.as_str()).collect();
    assert_eq!(names, ["Later", "Soon"]);
    assert_eq!(hosted[0].event.id, later.id);
    assert!(hosted[0].bookings.is_empty());

    let guests: Vec<_> = hosted[1].bookings.iter().map(|b| b.guest.id).collect();
    assert_eq!(guests, [bob.id, alice.id]);
    assert_eq!(hosted[1].bookings[1].guest.name.as_deref(), Some("alice"));
    assert!(hosted[1].bookings[1].guest.profile_pic.is_some());
}

#[tokio::test]
async fn hosted_events_only_include_own_events() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let other = create_user(&db, "other").await;
    host_event(&db, &other, true).await;

    assert!(bookings::hosted_events(&db, host.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn user_bookings_are_ordered_by_event_date() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;

    let far = host_event_on(&db, &host, "Far", true, Utc::now() + Duration::days(60)).await;
    let past = host_event_on(&db, &host, "Past", true, Utc::now() - Duration::days(3)).await;
    let near = host_event_on(&db, &host, "Near", false, Utc::now() + Duration::days(2)).await;

    for event in [&far, &past, &near] {
        bookings::create_booking(&db, Some(&caller(&guest)), event.id).await.unwrap();
    }

    let mine = bookings::user_bookings(&db, guest.id).await.unwrap();

    let ids: Vec<_> = mine.iter().map(|b| b.event.event.id).collect();
    assert_eq!(ids, [past.id, near.id, far.id]);
    assert!(mine.iter().all(|b| b.event.host.id == host.id));
    assert_eq!(mine[0].event.host.name.as_deref(), Some("host"));
    assert_eq!(mine[1].booking.status, BookingStatus::Pending);

    assert!(bookings::user_bookings(&db, host.id).await.unwrap().is_empty());
}
