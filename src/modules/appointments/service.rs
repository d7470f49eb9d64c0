use anyhow::anyhow;
use chrono::{NaiveTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::{info, instrument};

use caredesk_core::errors::AppError;
use caredesk_core::pagination::{PaginationMeta, PaginationParams};

use super::model::{
    Appointment, AppointmentFilterParams, AppointmentWithPatientRow, CreateAppointmentDto,
    PaginatedAppointmentsResponse,
};

const APPOINTMENT_COLUMNS: &str = "id, appointment_date, appointment_time, duration, \"type\", \
                                   status, notes, reason, diagnosis, treatment, user_id, \
                                   created_at, updated_at";

pub struct AppointmentService;

impl AppointmentService {
    /// Schedules an appointment for an existing patient. The date must not be
    /// in the past; type defaults to consultation and status to scheduled.
    #[instrument(skip_all, fields(patient_id = %dto.user_id))]
    pub async fn create_appointment(
        db: &PgPool,
        dto: CreateAppointmentDto,
    ) -> Result<Appointment, AppError> {
        let patient_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(dto.user_id)
                .fetch_one(db)
                .await?;

        if !patient_exists {
            return Err(AppError::not_found(anyhow!("Patient not found")));
        }

        if dto.appointment_date < Utc::now().date_naive() {
            return Err(AppError::bad_request(anyhow!(
                "Cannot schedule appointments in the past"
            )));
        }

        let appointment_time = NaiveTime::parse_from_str(&dto.appointment_time, "%H:%M")
            .map_err(|_| {
                AppError::bad_request(anyhow!("appointment_time must be in HH:MM format"))
            })?;

        let appointment = sqlx::query_as::<_, Appointment>(&format!(
            "INSERT INTO appointments (appointment_date, appointment_time, \"type\", user_id, reason)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {APPOINTMENT_COLUMNS}"
        ))
        .bind(dto.appointment_date)
        .bind(appointment_time)
        .bind(dto.appointment_type)
        .bind(dto.user_id)
        .bind(&dto.reason)
        .fetch_one(db)
        .await?;

        info!("Appointment created: {}", appointment.id);
        Ok(appointment)
    }

    /// Lists appointments joined with their patient's details, newest first.
    pub async fn get_appointments(
        db: &PgPool,
        filter: AppointmentFilterParams,
        pagination: PaginationParams,
    ) -> Result<PaginatedAppointmentsResponse, AppError> {
        let mut count_query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM appointments a");
        push_appointment_filters(&mut count_query, &filter);
        let total_items: i64 = count_query.build_query_scalar().fetch_one(db).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT a.id, a.appointment_date, a.appointment_time, a.duration, a.\"type\",
                    a.status, a.notes, a.reason, a.diagnosis, a.treatment,
                    a.created_at, a.updated_at,
                    u.id AS patient_id, u.username AS patient_username,
                    u.first_name AS patient_first_name, u.last_name AS patient_last_name,
                    u.dob AS patient_dob, u.gender AS patient_gender
             FROM appointments a
             JOIN users u ON u.id = a.user_id",
        );
        push_appointment_filters(&mut query, &filter);
        query.push(" ORDER BY a.appointment_date DESC, a.appointment_time DESC LIMIT ");
        query.push_bind(pagination.limit());
        query.push(" OFFSET ");
        query.push_bind(pagination.offset());

        let rows: Vec<AppointmentWithPatientRow> = query.build_query_as().fetch_all(db).await?;
        let meta = PaginationMeta::new(total_items, rows.len(), &pagination);

        Ok(PaginatedAppointmentsResponse {
            result: rows.into_iter().map(Into::into).collect(),
            meta,
        })
    }
}

fn push_appointment_filters(
    query: &mut QueryBuilder<'_, Postgres>,
    filter: &AppointmentFilterParams,
) {
    let mut separator = " WHERE ";

    if let Some(user_id) = filter.user_id {
        query.push(separator);
        query.push("a.user_id = ");
        query.push_bind(user_id);
        separator = " AND ";
    }

    if let Some(status) = filter.status {
        query.push(separator);
        query.push("a.status = ");
        query.push_bind(status);
        separator = " AND ";
    }

    if let Some(appointment_type) = filter.appointment_type {
        query.push(separator);
        query.push("a.\"type\" = ");
        query.push_bind(appointment_type);
    }
}
