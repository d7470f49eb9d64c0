use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use caredesk_auth::{Claims, TokenPair};
use caredesk_core::pagination::{PaginationMeta, PaginationParams};

use crate::modules::appointments::model::{
    Appointment, AppointmentDetails, AppointmentStatus, AppointmentType, CreateAppointmentDto,
    PaginatedAppointmentsResponse, PatientSummary,
};
use crate::modules::auth::controller::ErrorResponse;
use crate::modules::auth::model::{LoginRequest, LoginResponse, RegisterUserDto};
use crate::modules::users::model::{
    EditUserDto, Gender, PaginatedUsersResponse, User, UserRole, UserStatus,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::refresh,
        crate::modules::auth::controller::logout,
        crate::modules::auth::controller::profile,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::delete_user,
        crate::modules::appointments::controller::create_appointment,
        crate::modules::appointments::controller::get_appointments,
    ),
    components(
        schemas(
            User,
            UserRole,
            UserStatus,
            Gender,
            RegisterUserDto,
            EditUserDto,
            LoginRequest,
            LoginResponse,
            TokenPair,
            Claims,
            ErrorResponse,
            Appointment,
            AppointmentType,
            AppointmentStatus,
            AppointmentDetails,
            PatientSummary,
            CreateAppointmentDto,
            PaginationMeta,
            PaginationParams,
            PaginatedUsersResponse,
            PaginatedAppointmentsResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, and token lifecycle endpoints"),
        (name = "Users", description = "User management endpoints"),
        (name = "Appointments", description = "Appointment scheduling endpoints")
    ),
    info(
        title = "CareDesk API",
        version = "0.1.0",
        description = "A healthcare REST API built with Rust, Axum, and PostgreSQL featuring JWT-based authentication with rotating refresh tokens.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}
