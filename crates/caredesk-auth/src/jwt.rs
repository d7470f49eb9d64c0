//! Token creation and verification.
//!
//! Access and refresh tokens are independent credentials: separate claim
//! structures, separate secrets, separate lifetimes. Signing failures are
//! configuration errors and surface as 500s; verification failures are 401s.

use anyhow::anyhow;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use caredesk_config::JwtConfig;
use caredesk_core::AppError;

use crate::claims::{Claims, RefreshTokenClaims};

/// An access/refresh token pair as returned by login and refresh.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Creates a short-lived access token signed with the access secret.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + (jwt_config.access_expiration_minutes * 60) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.access_secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create access token: {}", e)))
}

/// Creates a long-lived refresh token signed with the refresh secret.
pub fn create_refresh_token(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp() as usize;
    let exp = now + (jwt_config.refresh_expiration_days * 86400) as usize;

    let claims = RefreshTokenClaims {
        sub: user_id.to_string(),
        email: email.to_string(),
        exp,
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_config.refresh_secret.as_bytes()),
    )
    .map_err(|e| AppError::internal(anyhow!("Failed to create refresh token: {}", e)))
}

/// Mints the access/refresh pair issued at login and on every rotation.
///
/// The two tokens are built independently; either signing failure aborts the
/// pair, so a caller never sees a half-issued result.
pub fn issue_token_pair(
    user_id: Uuid,
    email: &str,
    jwt_config: &JwtConfig,
) -> Result<TokenPair, AppError> {
    let access_token = create_access_token(user_id, email, jwt_config)?;
    let refresh_token = create_refresh_token(user_id, email, jwt_config)?;

    Ok(TokenPair {
        access_token,
        refresh_token,
    })
}

/// Verifies an access token's signature and expiry against the access secret.
pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.access_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired token")))
}

/// Verifies a refresh token's signature and expiry against the refresh secret.
pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshTokenClaims, AppError> {
    decode::<RefreshTokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_config.refresh_secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired token")))
}
