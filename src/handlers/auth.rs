use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::create_token;
use crate::AppState;

const MIN_MOBILE_LEN: usize = 10;
const MIN_PASSWORD_LEN: usize = 6;
const DUPLICATE_MOBILE: &str = "User already exists with this mobile number";

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub mobile: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserInfo,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub mobile: String,
    pub name: Option<String>,
    pub role: UserRole,
    pub is_verified: bool,
}

impl From<user::Model> for UserInfo {
    fn from(user: user::Model) -> Self {
        UserInfo {
            id: user.id,
            mobile: user.mobile,
            name: user.name,
            role: user.role,
            is_verified: user.is_verified,
        }
    }
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Inserts a new account. A mobile number taken by a concurrent registration
/// trips the unique index and is reported as a conflict.
pub async fn insert_user<C: ConnectionTrait>(
    db: &C,
    new_user: user::ActiveModel,
) -> AppResult<user::Model> {
    new_user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            AppError::Conflict(DUPLICATE_MOBILE.to_string())
        }
        _ => e.into(),
    })
}

fn issue_token(state: &AppState, user: user::Model) -> AppResult<Json<AuthResponse>> {
    let token = create_token(
        user.id,
        &user.mobile,
        user.role,
        user.is_verified,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(AuthResponse {
        token,
        user: user.into(),
    }))
}

/// Register a new account with a mobile number
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    let mobile = payload.mobile.trim().to_string();

    if mobile.chars().count() < MIN_MOBILE_LEN {
        return Err(AppError::BadRequest(
            "Mobile number must be at least 10 digits".to_string(),
        ));
    }
    if payload.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    // Check if mobile already exists
    let existing = user::Entity::find()
        .filter(user::Column::Mobile.eq(&mobile))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict(DUPLICATE_MOBILE.to_string()));
    }

    let new_user = user::ActiveModel {
        id: Set(Uuid::new_v4()),
        mobile: Set(mobile),
        password_hash: Set(hash_password(&payload.password)?),
        name: Set(payload.name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())),
        is_verified: Set(false),
        role: Set(UserRole::User),
        created_at: Set(Utc::now().into()),
        ..Default::default()
    };

    let user = insert_user(&state.db, new_user).await?;
    tracing::info!(user_id = %user.id, "User registered");

    issue_token(&state, user)
}

/// Login with mobile number and password
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let user = user::Entity::find()
        .filter(user::Column::Mobile.eq(payload.mobile.trim()))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid mobile number or password".to_string()))?;

    let parsed_hash = PasswordHash::new(&user.password_hash)
        .map_err(|e| AppError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid mobile number or password".to_string()))?;

    issue_token(&state, user)
}
