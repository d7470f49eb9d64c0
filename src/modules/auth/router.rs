use axum::{
    Router,
    routing::{get, post},
};

use crate::modules::auth::controller::{login, logout, profile, refresh, register};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", get(refresh))
        .route("/logout", post(logout))
        .route("/profile", get(profile))
}
