use std::future::Future;

use anyhow::anyhow;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use caredesk_core::errors::AppError;
use caredesk_core::mrn::{MRN_MAX_ATTEMPTS, generate_mrn};
use caredesk_core::pagination::{PaginationMeta, PaginationParams};
use caredesk_core::password::hash_password;

use crate::modules::auth::model::RegisterUserDto;

use super::model::{EditUserDto, PaginatedUsersResponse, User, UserFilterParams, UserStatus};

/// The sanitized column set. `password_hash`, `refresh_token_hash`, and
/// `last_login_at` are deliberately absent.
const USER_COLUMNS: &str = "id, username, email, first_name, last_name, dob, gender, mrn, \
                            active, roles, status, created_at, updated_at";

/// Picks MRN candidates until one is not already taken, giving up after
/// [`MRN_MAX_ATTEMPTS`]. Collisions are expected to be vanishingly rare; the
/// cap exists so a store malfunction cannot spin this loop forever.
pub async fn generate_unique_mrn<F, Fut>(mut exists: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    for _ in 0..MRN_MAX_ATTEMPTS {
        let candidate = generate_mrn();
        if !exists(candidate.clone()).await? {
            return Ok(candidate);
        }
        warn!("Generated MRN {candidate} already exists. Retrying...");
    }

    Err(AppError::internal(anyhow!(
        "Exhausted {MRN_MAX_ATTEMPTS} attempts to generate a unique MRN"
    )))
}

pub struct UserService;

impl UserService {
    /// Creates a user with a fresh MRN and the default `patient` role.
    /// Shared by public registration and staff-side user creation.
    #[instrument(skip_all, fields(username = %dto.username))]
    pub async fn create_new_user(db: &PgPool, dto: RegisterUserDto) -> Result<User, AppError> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE username = $1 OR email = $2",
        )
        .bind(&dto.username)
        .bind(&dto.email)
        .fetch_optional(db)
        .await?;

        if existing.is_some() {
            return Err(AppError::conflict(anyhow!(
                "Username or email already exists"
            )));
        }

        let password_hash = hash_password(&dto.password)?;

        let mrn = generate_unique_mrn(|candidate| {
            let db = db.clone();
            async move { Self::mrn_exists(&db, &candidate).await }
        })
        .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name, dob, gender, mrn)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&dto.username)
        .bind(&dto.email)
        .bind(&password_hash)
        .bind(&dto.first_name)
        .bind(&dto.last_name)
        .bind(dto.dob)
        .bind(dto.gender)
        .bind(&mrn)
        .fetch_one(db)
        .await?;

        info!("User created successfully: {}", user.id);
        Ok(user)
    }

    async fn mrn_exists(db: &PgPool, mrn: &str) -> Result<bool, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE mrn = $1)")
                .bind(mrn)
                .fetch_one(db)
                .await?;

        Ok(exists)
    }

    /// Looks up a user that is still allowed to hold a session. Deactivated
    /// and non-active accounts come back as `None`, which is how issued
    /// tokens die when an account is disabled mid-lifetime.
    pub async fn find_active_user(db: &PgPool, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND active = TRUE AND status = $2"
        ))
        .bind(id)
        .bind(UserStatus::Active)
        .fetch_optional(db)
        .await?;

        Ok(user)
    }

    pub async fn get_all_users(
        db: &PgPool,
        filter: UserFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedUsersResponse, AppError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM users");
        push_user_filters(&mut count_query, &filter);
        let total_items: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut query =
            QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
        push_user_filters(&mut query, &filter);
        query.push(" ORDER BY created_at DESC LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let users: Vec<User> = query.build_query_as().fetch_all(db).await?;
        let meta = PaginationMeta::new(total_items, users.len(), &pagination);

        Ok(PaginatedUsersResponse {
            result: users,
            meta,
        })
    }

    pub async fn get_user(db: &PgPool, id: Uuid) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("User not found")))
    }

    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn update_user_details(
        db: &PgPool,
        id: Uuid,
        dto: EditUserDto,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users
             SET first_name = COALESCE($2, first_name),
                 last_name = COALESCE($3, last_name),
                 dob = COALESCE($4, dob),
                 gender = COALESCE($5, gender),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.first_name)
        .bind(dto.last_name)
        .bind(dto.dob)
        .bind(dto.gender)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("User not found")))?;

        Ok(user)
    }

    #[instrument(skip_all, fields(user_id = %id))]
    pub async fn delete_user(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("User not found")));
        }

        Ok(())
    }

    /// Creates the administrator account used to bootstrap a deployment.
    /// Only reachable from the `seed-admin` CLI path, never over HTTP.
    pub async fn seed_admin(
        db: &PgPool,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        let existing = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM users WHERE username = $1 OR email = $2",
        )
        .bind(username)
        .bind(email)
        .fetch_optional(db)
        .await?;

        if existing.is_some() {
            return Err(AppError::conflict(anyhow!(
                "An account with that username or email already exists"
            )));
        }

        let password_hash = hash_password(password)?;

        let mrn = generate_unique_mrn(|candidate| {
            let db = db.clone();
            async move { Self::mrn_exists(&db, &candidate).await }
        })
        .await?;

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, first_name, last_name,
                                dob, gender, mrn, roles)
             VALUES ($1, $2, $3, 'Super', 'Admin', DATE '1970-01-01', 'male', $4,
                     ARRAY['admin']::user_role[])
             RETURNING {USER_COLUMNS}"
        ))
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(&mrn)
        .fetch_one(db)
        .await?;

        Ok(user)
    }
}

fn push_user_filters(query: &mut QueryBuilder<'_, Postgres>, filter: &UserFilterParams) {
    let mut separator = " WHERE ";

    if let Some(gender) = filter.gender {
        query.push(separator);
        query.push("gender = ");
        query.push_bind(gender);
        separator = " AND ";
    }

    if let Some(role) = filter.role {
        query.push(separator);
        query.push_bind(role);
        query.push(" = ANY(roles)");
    }
}
