use std::env;

/// JWT signing configuration.
///
/// Access and refresh tokens are signed with distinct secrets so that a
/// compromised access secret cannot be used to mint refresh tokens (or the
/// other way around).
#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    /// Access token lifetime, in minutes.
    pub access_expiration_minutes: i64,
    /// Refresh token lifetime, in days.
    pub refresh_expiration_days: i64,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            access_secret: env::var("JWT_ACCESS_SECRET")
                .unwrap_or_else(|_| "access-secret-change-in-production".to_string()),
            refresh_secret: env::var("JWT_REFRESH_SECRET")
                .unwrap_or_else(|_| "refresh-secret-change-in-production".to_string()),
            access_expiration_minutes: env::var("JWT_ACCESS_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15),
            refresh_expiration_days: env::var("JWT_REFRESH_EXPIRATION_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
        }
    }
}
