mod common;

use event_booking_backend::{
    entities::booking::BookingStatus,
    services::{booking as bookings, review as reviews, ServiceError},
};
use uuid::Uuid;

use common::{caller, create_user, host_event, setup_db, tick};

#[tokio::test]
async fn guest_review_of_host_on_pending_booking() {
    let db = setup_db().await;
    let host = create_user(&db, "H").await;
    let guest = create_user(&db, "G").await;
    let event = host_event(&db, &host, false).await;

    let booking = bookings::create_booking(&db, Some(&caller(&guest)), event.id)
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);

    let review = reviews::submit_review(
        &db,
        Some(&caller(&guest)),
        booking.id,
        5,
        Some("Great!".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(review.reviewee_id, host.id);
    assert_eq!(review.comment.as_deref(), Some("Great!"));

    let summary = reviews::user_reviews(&db, host.id).await.unwrap();
    assert_eq!(summary.average, "5.0");
    assert_eq!(summary.count, 1);
    assert_eq!(summary.reviews[0].reviewer.id, guest.id);
    assert_eq!(summary.reviews[0].reviewer.name.as_deref(), Some("G"));

    let again = reviews::submit_review(&db, Some(&caller(&guest)), booking.id, 4, None).await;
    assert_eq!(again.unwrap_err(), ServiceError::DuplicateReview);
    assert_eq!(reviews::user_reviews(&db, host.id).await.unwrap().count, 1);
}

#[tokio::test]
async fn roles_resolve_symmetrically() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;
    let event = host_event(&db, &host, true).await;
    let booking = bookings::create_booking(&db, Some(&caller(&guest)), event.id)
        .await
        .unwrap();

    let by_guest = reviews::submit_review(&db, Some(&caller(&guest)), booking.id, 4, None)
        .await
        .unwrap();
    let by_host = reviews::submit_review(&db, Some(&caller(&host)), booking.id, 2, None)
        .await
        .unwrap();

    assert_eq!((by_guest.reviewer_id, by_guest.reviewee_id), (guest.id, host.id));
    assert_eq!((by_host.reviewer_id, by_host.reviewee_id), (host.id, guest.id));
}

#[tokio::test]
async fn outsiders_cannot_review_whatever_the_rating() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;
    let outsider = create_user(&db, "outsider").await;
    let event = host_event(&db, &host, true).await;
    let booking = bookings::create_booking(&db, Some(&caller(&guest)), event.id)
        .await
        .unwrap();

    for rating in [-3, 0, 1, 3, 5, 6, 100] {
        let err = reviews::submit_review(&db, Some(&caller(&outsider)), booking.id, rating, None)
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::NotAParticipant);
    }
}

#[tokio::test]
async fn rating_must_be_within_one_to_five() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;
    let event = host_event(&db, &host, true).await;
    let booking = bookings::create_booking(&db, Some(&caller(&guest)), event.id)
        .await
        .unwrap();

    for rating in [0, 6] {
        let err = reviews::submit_review(&db, Some(&caller(&guest)), booking.id, rating, None)
            .await
            .unwrap_err();
        assert_eq!(err, ServiceError::InvalidRating(rating));
    }

    let missing = reviews::submit_review(&db, Some(&caller(&guest)), Uuid::new_v4(), 3, None).await;
    assert_eq!(missing.unwrap_err(), ServiceError::NotFound("Booking"));

    let anonymous = reviews::submit_review(&db, None, booking.id, 3, None).await;
    assert_eq!(anonymous.unwrap_err(), ServiceError::Unauthenticated);
}

#[tokio::test]
async fn user_without_reviews_has_zero_average() {
    let db = setup_db().await;
    let user = create_user(&db, "lonely").await;

    let summary = reviews::user_reviews(&db, user.id).await.unwrap();
    assert_eq!(summary.average, "0");
    assert_eq!(summary.count, 0);
    assert!(summary.reviews.is_empty());
}

#[tokio::test]
async fn reviews_are_newest_first_with_one_decimal_average() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let mut reviewers = Vec::new();

    for (i, rating) in [5, 4, 4].into_iter().enumerate() {
        let guest = create_user(&db, &format!("guest{}", i)).await;
        let event = host_event(&db, &host, true).await;
        let booking = bookings::create_booking(&db, Some(&caller(&guest)), event.id)
            .await
            .unwrap();
        reviews::submit_review(&db, Some(&caller(&guest)), booking.id, rating, None)
            .await
            .unwrap();
        reviewers.push(guest.id);
        tick().await;
    }

    let summary = reviews::user_reviews(&db, host.id).await.unwrap();
    assert_eq!(summary.count, 3);
    assert_eq!(summary.average, "4.3");

    let order: Vec<_> = summary.reviews.iter().map(|r| r.reviewer.id).collect();
    reviewers.reverse();
    assert_eq!(order, reviewers);
}

#[tokio::test]
async fn eligibility_requires_approved_unreviewed_booking() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;
    let stranger = create_user(&db, "stranger").await;

    // Pending bookings never make anyone eligible
    let curated = host_event(&db, &host, false).await;
    bookings::create_booking(&db, Some(&caller(&guest)), curated.id).await.unwrap();
    assert_eq!(reviews::reviewable_booking(&db, guest.id, host.id).await.unwrap(), None);

    let open = host_event(&db, &host, true).await;
    let booking = bookings::create_booking(&db, Some(&caller(&guest)), open.id)
        .await
        .unwrap();

    // Both directions see the approved booking
    assert_eq!(
        reviews::reviewable_booking(&db, guest.id, host.id).await.unwrap(),
        Some(booking.id)
    );
    assert_eq!(
        reviews::reviewable_booking(&db, host.id, guest.id).await.unwrap(),
        Some(booking.id)
    );
    assert_eq!(reviews::reviewable_booking(&db, stranger.id, host.id).await.unwrap(), None);

    reviews::submit_review(&db, Some(&caller(&guest)), booking.id, 5, None)
        .await
        .unwrap();

    // Resolves for the guest, still open for the host
    assert_eq!(reviews::reviewable_booking(&db, guest.id, host.id).await.unwrap(), None);
    assert_eq!(
        reviews::reviewable_booking(&db, host.id, guest.id).await.unwrap(),
        Some(booking.id)
    );
}

#[tokio::test]
async fn average_rounds_half_tenths_up() {
    let db = setup_db().await;
    let host = create_user(&db, "host").await;
    let guest = create_user(&db, "guest").await;

    for rating in [4, 4, 4, 5] {
        let event = host_event(&db, &host, true).await;
        let booking = bookings::create_booking(&db, Some(&caller(&guest)), event.id)
            .await
            .unwrap();
        reviews::submit_review(&db, Some(&caller(&guest)), booking.id, rating, None)
            .await
            .unwrap();
    }

    let summary = reviews::user_reviews(&db, host.id).await.unwrap();
    assert_eq!(summary.count, 4);
    assert_eq!(summary.average, "4.3");
}
