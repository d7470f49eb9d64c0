//! User entities, enums, and DTOs.
//!
//! [`User`] is the sanitized view of a user row: `password_hash`,
//! `refresh_token_hash`, and `last_login_at` are never selected into it, so
//! it can safely cross the HTTP boundary.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use caredesk_core::pagination::PaginationMeta;

/// Capability roles. A user holds one or more; `patient` is the default and
/// least privileged.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Doctor,
    Nurse,
    #[default]
    Patient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Suspended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "gender", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A user record, sanitized for responses.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
    /// Medical record number, unique per user.
    pub mrn: String,
    pub active: bool,
    pub roles: Vec<UserRole>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update of user details; absent fields are left untouched.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct EditUserDto {
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<Gender>,
}

/// Filters for the user list endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct UserFilterParams {
    pub gender: Option<Gender>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedUsersResponse {
    pub result: Vec<User>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_role_is_patient() {
        assert_eq!(UserRole::default(), UserRole::Patient);
    }

    #[test]
    fn roles_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), r#""admin""#);
        assert_eq!(serde_json::to_string(&UserRole::Nurse).unwrap(), r#""nurse""#);
        assert_eq!(
            serde_json::to_string(&UserStatus::Suspended).unwrap(),
            r#""suspended""#
        );
    }

    #[test]
    fn sanitized_user_has_no_credential_fields() {
        let user = User {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Smith".to_string(),
            dob: NaiveDate::from_ymd_opt(1990, 1, 15).unwrap(),
            gender: Gender::Female,
            mrn: "MRN0000000000000ABCDEFGHA".to_string(),
            active: true,
            roles: vec![UserRole::Patient],
            status: UserStatus::Active,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("refresh_token"));
        assert!(!json.contains("last_login"));
    }
}
