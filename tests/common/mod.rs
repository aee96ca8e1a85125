#![allow(dead_code)]

use chrono::{DateTime, Duration, Utc};
use event_booking_backend::{
    config::Config,
    entities::{event, user},
    services::{event::NewEvent, Caller},
    AppState,
};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use uuid::Uuid;

pub async fn setup_db() -> DatabaseConnection {
    // A single connection keeps every query on the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);

    let db = Database::connect(options)
        .await
        .expect("failed to open in-memory sqlite");
    Migrator::up(&db, None).await.expect("migrations failed");
    db
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expiration_hours: 1,
        server_host: "127.0.0.1".to_string(),
        server_port: 0,
        storage_url: String::new(),
        storage_key: String::new(),
        storage_bucket: "events".to_string(),
        admin_mobile: None,
        admin_password: None,
    }
}

pub async fn test_state() -> AppState {
    AppState::new(setup_db().await, test_config())
}

pub async fn create_user(db: &DatabaseConnection, name: &str) -> user::Model {
    user::ActiveModel {
        id: Set(Uuid::new_v4()),
        mobile: Set(format!("555{}", &Uuid::new_v4().simple().to_string()[..10])),
        password_hash: Set("not-a-real-hash".to_string()),
        name: Set(Some(name.to_string())),
        profile_pic: Set(Some(format!("https://img.example/{}.png", name))),
        is_verified: Set(false),
        role: Set(user::UserRole::User),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    }
    .insert(db)
    .await
    .expect("failed to insert user")
}

pub fn caller(user: &user::Model) -> Caller {
    Caller {
        id: user.id,
        role: user.role,
    }
}

pub fn new_event(name: &str, auto_approve: bool, date: DateTime<Utc>) -> NewEvent {
    NewEvent {
        name: name.to_string(),
        details: format!("{} with friends and neighbours", name),
        capacity: 10,
        price: 20.0,
        location: "Lisbon".to_string(),
        photos: vec!["https://img.example/a.png".to_string()],
        auto_approve,
        date,
    }
}

pub async fn host_event(
    db: &DatabaseConnection,
    host: &user::Model,
    auto_approve: bool,
) -> event::Model {
    host_event_on(db, host, "Supper club", auto_approve, Utc::now() + Duration::days(7)).await
}

pub async fn host_event_on(
    db: &DatabaseConnection,
    host: &user::Model,
    name: &str,
    auto_approve: bool,
    date: DateTime<Utc>,
) -> event::Model {
    event_booking_backend::services::event::create_event(
        db,
        Some(&caller(host)),
        new_event(name, auto_approve, date),
    )
    .await
    .expect("failed to create event")
}

/// Gives consecutive inserts distinct `created_at` values
pub async fn tick() {
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
}
