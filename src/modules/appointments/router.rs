use axum::{Router, routing::get};

use crate::modules::appointments::controller::{create_appointment, get_appointments};
use crate::state::AppState;

pub fn init_appointments_router() -> Router<AppState> {
    Router::new().route("/", get(get_appointments).post(create_appointment))
}
