use std::time::Duration;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait,
    QueryFilter, Set,
};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use crate::config::Config;
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::handlers::auth::hash_password;

pub async fn connect(config: &Config) -> AppResult<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database_url.clone());
    options
        .max_connections(20)
        .connect_timeout(Duration::from_secs(10));

    Database::connect(options)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))
}

pub async fn migrate(db: &DatabaseConnection) -> AppResult<()> {
    migration::Migrator::up(db, None).await?;
    Ok(())
}

/// Creates the configured admin account unless a user with that mobile already exists.
pub async fn seed_admin(db: &DatabaseConnection, config: &Config) -> AppResult<()> {
    let (Some(mobile), Some(password)) = (&config.admin_mobile, &config.admin_password) else {
        tracing::debug!("No admin credentials configured, skipping seed");
        return Ok(());
    };

    let existing = user::Entity::find()
        .filter(user::Column::Mobile.eq(mobile.as_str()))
        .one(db)
        .await?;

    if existing.is_some() {
        return Ok(());
    }

    let admin = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        mobile: Set(mobile.clone()),
        password_hash: Set(hash_password(password)?),
        name: Set(Some("Admin".to_string())),
        is_verified: Set(true),
        role: Set(UserRole::Admin),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    admin.insert(db).await?;
    tracing::info!("Admin account created: {}", mobile);
    Ok(())
}
