//! Token-backed request extractors.
//!
//! [`AuthUser`] is the access guard: it verifies the bearer access token and
//! then re-resolves the user from the database, so a token outlives neither
//! the account's `active` flag nor its `status`. [`RefreshUser`] verifies a
//! bearer refresh token and keeps the raw token around for rotation.

use anyhow::anyhow;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use caredesk_auth::{verify_access_token, verify_refresh_token};
use caredesk_core::errors::AppError;

use crate::modules::users::model::{User, UserRole};
use crate::modules::users::service::UserService;
use crate::state::AppState;

/// The authenticated, still-active user behind a valid access token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl AuthUser {
    pub fn user_id(&self) -> Uuid {
        self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn roles(&self) -> &[UserRole] {
        &self.0.roles
    }
}

pub(crate) fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(anyhow!("Missing authorization header")))?;

    header
        .strip_prefix("Bearer ")
        .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid authorization header format")))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_owned();
        let claims = verify_access_token(&token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired token")))?;

        // A token that verifies but points at a missing or deactivated user
        // is treated exactly like a bad token.
        let user = UserService::find_active_user(&state.db, user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid or expired token")))?;

        Ok(AuthUser(user))
    }
}

/// The subject of a valid refresh token, plus the token itself.
///
/// Deliberately not a [`User`]: session state is checked against the stored
/// hash during rotation, not here.
#[derive(Debug, Clone)]
pub struct RefreshUser {
    pub user_id: Uuid,
    pub refresh_token: String,
}

impl FromRequestParts<AppState> for RefreshUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?.to_owned();
        let claims = verify_refresh_token(&token, &state.jwt_config)?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::unauthorized(anyhow!("Invalid or expired token")))?;

        Ok(RefreshUser {
            user_id,
            refresh_token: token,
        })
    }
}
