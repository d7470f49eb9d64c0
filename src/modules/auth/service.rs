//! Credential verification and the refresh-token session lifecycle.
//!
//! A user has at most one refresh session, stored as a bcrypt hash of the
//! SHA-256 digest of the latest refresh token. Rotation swaps that hash with
//! a compare-and-set so a replayed or raced token loses deterministically.

use anyhow::anyhow;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use caredesk_auth::{TokenPair, issue_token_pair};
use caredesk_config::JwtConfig;
use caredesk_core::errors::AppError;
use caredesk_core::password::{hash_refresh_token, verify_password, verify_refresh_token_hash};

use crate::modules::users::model::{Gender, User, UserRole, UserStatus};
use crate::modules::users::service::UserService;

use super::model::{LoginRequest, LoginResponse, RegisterUserDto};

/// Internal row that includes the password hash. Never serialized; converted
/// to the sanitized [`User`] before anything leaves the service.
#[derive(sqlx::FromRow)]
struct AuthUserRow {
    id: Uuid,
    username: String,
    email: String,
    first_name: String,
    last_name: String,
    dob: NaiveDate,
    gender: Gender,
    mrn: String,
    active: bool,
    roles: Vec<UserRole>,
    status: UserStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    password_hash: String,
}

impl AuthUserRow {
    fn into_user(self) -> User {
        User {
            id: self.id,
            username: self.username,
            email: self.email,
            first_name: self.first_name,
            last_name: self.last_name,
            dob: self.dob,
            gender: self.gender,
            mrn: self.mrn,
            active: self.active,
            roles: self.roles,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct SessionRow {
    email: String,
    refresh_token_hash: Option<String>,
}

pub struct AuthService;

impl AuthService {
    /// Public self-registration. New accounts always start as patients.
    pub async fn register(db: &PgPool, dto: RegisterUserDto) -> Result<User, AppError> {
        UserService::create_new_user(db, dto).await
    }

    /// Verifies credentials and opens a refresh session.
    ///
    /// Unknown identifier, wrong password, and deactivated account all fail
    /// with the same 401 so the response does not reveal which accounts exist.
    #[instrument(skip_all, fields(login_id = %request.login_id))]
    pub async fn login(
        db: &PgPool,
        request: LoginRequest,
        jwt_config: &JwtConfig,
    ) -> Result<LoginResponse, AppError> {
        let row = sqlx::query_as::<_, AuthUserRow>(
            "SELECT id, username, email, first_name, last_name, dob, gender, mrn,
                    active, roles, status, created_at, updated_at, password_hash
             FROM users
             WHERE (username = $1 OR email = $1) AND active = TRUE AND status = $2",
        )
        .bind(&request.login_id)
        .bind(UserStatus::Active)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::unauthorized(anyhow!("Invalid username or password")))?;

        if !verify_password(&request.password, &row.password_hash)? {
            warn!("Failed login attempt");
            return Err(AppError::unauthorized(anyhow!(
                "Invalid username or password"
            )));
        }

        let user = row.into_user();
        let tokens = issue_token_pair(user.id, &user.email, jwt_config)?;
        Self::persist_refresh_token(db, user.id, &tokens.refresh_token).await?;

        info!("User logged in: {}", user.id);
        Ok(LoginResponse::new(user, tokens))
    }

    /// Rotates the session: the presented refresh token is consumed and a new
    /// pair is issued.
    ///
    /// Every failure here is a 403 with the same message. A missing session,
    /// a token that was already rotated, and a token for a deactivated user
    /// are indistinguishable to the caller.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn refresh_tokens(
        db: &PgPool,
        user_id: Uuid,
        presented_token: &str,
        jwt_config: &JwtConfig,
    ) -> Result<TokenPair, AppError> {
        let session = sqlx::query_as::<_, SessionRow>(
            "SELECT email, refresh_token_hash FROM users
             WHERE id = $1 AND active = TRUE AND status = $2",
        )
        .bind(user_id)
        .bind(UserStatus::Active)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::forbidden(anyhow!("Access denied")))?;

        let stored_hash = session
            .refresh_token_hash
            .ok_or_else(|| AppError::forbidden(anyhow!("Access denied")))?;

        if !verify_refresh_token_hash(presented_token, &stored_hash)? {
            warn!("Refresh token did not match stored session");
            return Err(AppError::forbidden(anyhow!("Access denied")));
        }

        let tokens = issue_token_pair(user_id, &session.email, jwt_config)?;
        let new_hash = hash_refresh_token(&tokens.refresh_token)?;

        // Compare-and-set on the hash we just verified. If a concurrent
        // refresh or a logout got there first, zero rows match and the newly
        // minted pair is discarded.
        let result = sqlx::query(
            "UPDATE users
             SET refresh_token_hash = $2, last_login_at = NOW(), updated_at = NOW()
             WHERE id = $1 AND refresh_token_hash = $3",
        )
        .bind(user_id)
        .bind(&new_hash)
        .bind(&stored_hash)
        .execute(db)
        .await?;

        if result.rows_affected() == 0 {
            warn!("Lost refresh rotation race");
            return Err(AppError::forbidden(anyhow!("Access denied")));
        }

        Ok(tokens)
    }

    /// Revokes the refresh session. Idempotent: logging out twice, or with no
    /// session open, succeeds quietly.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn logout(db: &PgPool, user_id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET refresh_token_hash = NULL, updated_at = NOW() WHERE id = $1")
            .bind(user_id)
            .execute(db)
            .await?;

        info!("User logged out");
        Ok(())
    }

    async fn persist_refresh_token(
        db: &PgPool,
        user_id: Uuid,
        refresh_token: &str,
    ) -> Result<(), AppError> {
        let hashed = hash_refresh_token(refresh_token)?;

        sqlx::query(
            "UPDATE users
             SET refresh_token_hash = $2, last_login_at = NOW(), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(&hashed)
        .execute(db)
        .await?;

        Ok(())
    }
}
