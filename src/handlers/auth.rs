use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{extract::State, Json};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::{diner, restaurant};
use crate::error::{AppError, AppResult};
use crate::utils::jwt::{create_token, AccountRole};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterDinerRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRestaurantRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct DinerAuthResponse {
    pub token: String,
    pub diner: DinerInfo,
}

#[derive(Debug, Serialize)]
pub struct DinerInfo {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct RestaurantAuthResponse {
    pub token: String,
    pub restaurant: RestaurantInfo,
}

#[derive(Debug, Serialize)]
pub struct RestaurantInfo {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub city: String,
    pub state: String,
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    Ok(argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?
        .to_string())
}

fn verify_password(password: &str, stored_hash: &str) -> AppResult<()> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| AppError::Internal(format!("Failed to parse password hash: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AppError::Unauthorized("Invalid email or password".to_string()))
}

/// Register a new diner account
pub async fn register_diner(
    State(state): State<AppState>,
    Json(payload): Json<RegisterDinerRequest>,
) -> AppResult<Json<DinerAuthResponse>> {
    // Check if email already exists
    let existing = diner::Entity::find()
        .filter(diner::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let diner_id = Uuid::new_v4();
    let new_diner = diner::ActiveModel {
        id: Set(diner_id),
        email: Set(payload.email.clone()),
        password_hash: Set(password_hash),
        name: Set(payload.name.clone()),
        phone: Set(payload.phone.clone()),
        ..Default::default()
    };

    let diner = new_diner.insert(&state.db).await?;

    let token = create_token(
        diner.id,
        &diner.email,
        AccountRole::Diner,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(DinerAuthResponse {
        token,
        diner: DinerInfo {
            id: diner.id,
            email: diner.email,
            name: diner.name,
        },
    }))
}

/// Login with a diner account
pub async fn login_diner(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<DinerAuthResponse>> {
    let diner = diner::Entity::find()
        .filter(diner::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    verify_password(&payload.password, &diner.password_hash)?;

    let token = create_token(
        diner.id,
        &diner.email,
        AccountRole::Diner,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(DinerAuthResponse {
        token,
        diner: DinerInfo {
            id: diner.id,
            email: diner.email,
            name: diner.name,
        },
    }))
}

/// Register a new restaurant account
pub async fn register_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRestaurantRequest>,
) -> AppResult<Json<RestaurantAuthResponse>> {
    let existing = restaurant::Entity::find()
        .filter(restaurant::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Conflict("Email already registered".to_string()));
    }

    let password_hash = hash_password(&payload.password)?;

    let restaurant_id = Uuid::new_v4();
    let new_restaurant = restaurant::ActiveModel {
        id: Set(restaurant_id),
        email: Set(payload.email.clone()),
        password_hash: Set(password_hash),
        name: Set(payload.name.clone()),
        phone: Set(payload.phone.clone()),
        address: Set(payload.address.clone()),
        city: Set(payload.city.clone()),
        state: Set(payload.state.clone()),
        about_us: Set(None),
        open_hours: Set(None),
        profile_image: Set(None),
        images: Set(serde_json::json!([])),
        ..Default::default()
    };

    let restaurant = new_restaurant.insert(&state.db).await?;

    let token = create_token(
        restaurant.id,
        &restaurant.email,
        AccountRole::Restaurant,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(RestaurantAuthResponse {
        token,
        restaurant: RestaurantInfo {
            id: restaurant.id,
            email: restaurant.email,
            name: restaurant.name,
            city: restaurant.city,
            state: restaurant.state,
        },
    }))
}

/// Login with a restaurant account
pub async fn login_restaurant(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<RestaurantAuthResponse>> {
    let restaurant = restaurant::Entity::find()
        .filter(restaurant::Column::Email.eq(&payload.email))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

    verify_password(&payload.password, &restaurant.password_hash)?;

    let token = create_token(
        restaurant.id,
        &restaurant.email,
        AccountRole::Restaurant,
        &state.config.jwt_secret,
        state.config.jwt_expiration_hours,
    )?;

    Ok(Json(RestaurantAuthResponse {
        token,
        restaurant: RestaurantInfo {
            id: restaurant.id,
            email: restaurant.email,
            name: restaurant.name,
            city: restaurant.city,
            state: restaurant.state,
        },
    }))
}
