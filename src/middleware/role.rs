//! Role-based access control.
//!
//! Authorization is an OR over roles: a request passes if the user holds any
//! of the roles a route requires. An empty requirement means the route only
//! needs authentication.

use anyhow::anyhow;
use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use caredesk_core::errors::AppError;

use crate::modules::users::model::{User, UserRole};
use crate::state::AppState;

use super::auth::AuthUser;

/// Returns true when the user holds at least one of the required roles.
pub fn is_allowed(user_roles: &[UserRole], required_roles: &[UserRole]) -> bool {
    required_roles.is_empty() || user_roles.iter().any(|role| required_roles.contains(role))
}

/// Route layer for the staff-facing modules: admins, doctors, and nurses get
/// through; patients do not.
pub async fn require_clinical_staff(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    require_roles(
        state,
        req,
        next,
        &[UserRole::Admin, UserRole::Doctor, UserRole::Nurse],
    )
    .await
}

async fn require_roles(
    state: AppState,
    req: Request,
    next: Next,
    allowed: &[UserRole],
) -> Response {
    let (mut parts, body) = req.into_parts();

    let auth_user = match AuthUser::from_request_parts(&mut parts, &state).await {
        Ok(user) => user,
        Err(err) => return err.into_response(),
    };

    if !is_allowed(auth_user.roles(), allowed) {
        return AppError::forbidden(anyhow!(
            "You do not have sufficient permissions to access this resource"
        ))
        .into_response();
    }

    next.run(Request::from_parts(parts, body)).await
}

/// Extractor variant of the role check for the few admin-only handlers that
/// sit inside an otherwise staff-wide router.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;

        if !is_allowed(&user.roles, &[UserRole::Admin]) {
            return Err(AppError::forbidden(anyhow!(
                "You do not have sufficient permissions to access this resource"
            )));
        }

        Ok(RequireAdmin(user))
    }
}
