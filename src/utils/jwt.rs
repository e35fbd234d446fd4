use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Which of the two account stores the token subject lives in. Neither
/// table carries a role column; the role exists only in the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Diner,
    Restaurant,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Diner or restaurant id, depending on `role`
    pub sub: Uuid,
    pub email: String,
    pub role: AccountRole,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    fn new(account_id: Uuid, email: &str, role: AccountRole, valid_hours: i64) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            email: email.to_string(),
            role,
            exp: (now + Duration::hours(valid_hours)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

pub fn create_token(
    account_id: Uuid,
    email: &str,
    role: AccountRole,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(account_id, email, role, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
}

pub fn verify_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| AppError::Unauthorized(format!("Invalid token: {}", e)))
}
