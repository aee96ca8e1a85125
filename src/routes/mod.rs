use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::handlers::{admin, auth, bookings, chat, events, profile, reviews, upload};
use crate::middleware::auth::{auth_middleware, require_admin};
use crate::middleware::rate_limit::create_public_governor;
use crate::middleware::user_rate_limit::create_user_governor;
use crate::AppState;

/// Uploaded photos and ID documents
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let public_governor = create_public_governor();
    let user_governor = create_user_governor();

    // Public routes (rate limited per IP)
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .layer(public_governor.clone());

    let public_routes = Router::new()
        .route("/events", get(events::list_events))
        .route("/events/{id}", get(events::get_event))
        .route("/users/{id}/reviews", get(reviews::user_reviews))
        .layer(public_governor);

    // Member routes (requires auth, rate limited per user)
    let member_routes = Router::new()
        .route(
            "/host/events",
            get(bookings::hosted_events).post(events::create_event),
        )
        .route("/bookings", post(bookings::create_booking).get(bookings::my_bookings))
        .route("/reviews", post(reviews::submit_review))
        .route("/profile", get(profile::get_profile).put(profile::update_profile))
        .route("/chat", get(chat::conversations))
        .route("/chat/{user_id}", get(chat::chat_view).post(chat::send_message))
        .route(
            "/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .layer(user_governor)
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    // Admin routes (requires auth + admin role)
    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/{id}/verify", put(admin::verify_user))
        .layer(middleware::from_fn(require_admin))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api", public_routes.merge(member_routes))
        .nest("/api/admin", admin_routes)
        .with_state(state)
}
