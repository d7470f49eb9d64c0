use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::instrument;

use caredesk_core::errors::AppError;
use caredesk_core::pagination::PaginationParams;

use crate::modules::auth::controller::ErrorResponse;
use crate::state::AppState;
use crate::validator::ValidatedJson;

use super::model::{
    Appointment, AppointmentFilterParams, CreateAppointmentDto, PaginatedAppointmentsResponse,
};
use super::service::AppointmentService;

/// Schedule an appointment for a patient
#[utoipa::path(
    post,
    path = "/api/appointments",
    request_body = CreateAppointmentDto,
    responses(
        (status = 201, description = "Appointment scheduled", body = Appointment),
        (status = 400, description = "Date in the past or malformed time", body = ErrorResponse),
        (status = 404, description = "Patient not found", body = ErrorResponse),
        (status = 422, description = "Validation error", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
#[instrument(skip_all)]
pub async fn create_appointment(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateAppointmentDto>,
) -> Result<(StatusCode, Json<Appointment>), AppError> {
    let appointment = AppointmentService::create_appointment(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// List appointments with patient details
#[utoipa::path(
    get,
    path = "/api/appointments",
    params(AppointmentFilterParams, PaginationParams),
    responses(
        (status = 200, description = "Paginated appointment list", body = PaginatedAppointmentsResponse),
        (status = 401, description = "Not authenticated", body = ErrorResponse),
        (status = 403, description = "Insufficient permissions", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Appointments"
)]
#[instrument(skip_all)]
pub async fn get_appointments(
    State(state): State<AppState>,
    Query(filter): Query<AppointmentFilterParams>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<PaginatedAppointmentsResponse>, AppError> {
    let response = AppointmentService::get_appointments(&state.db, filter, pagination).await?;
    Ok(Json(response))
}
