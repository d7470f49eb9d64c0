use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use caredesk_core::pagination::PaginationMeta;

use crate::modules::users::model::Gender;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "appointment_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentType {
    #[default]
    Consultation,
    Checkup,
    Therapy,
    Vaccination,
    FollowUp,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    /// Duration in minutes.
    pub duration: i32,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateAppointmentDto {
    pub appointment_date: NaiveDate,
    /// Time of day as `HH:MM`, 24-hour clock.
    #[validate(custom(function = validate_time_of_day))]
    pub appointment_time: String,
    #[serde(rename = "type", default)]
    pub appointment_type: AppointmentType,
    pub user_id: Uuid,
    pub reason: Option<String>,
}

fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map(|_| ())
        .map_err(|_| {
            ValidationError::new("appointment_time")
                .with_message("appointment_time must be in HH:MM format".into())
        })
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AppointmentFilterParams {
    pub user_id: Option<Uuid>,
    pub status: Option<AppointmentStatus>,
    #[serde(rename = "type")]
    pub appointment_type: Option<AppointmentType>,
}

/// The subset of patient fields joined onto appointment listings.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PatientSummary {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub dob: NaiveDate,
    pub gender: Gender,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AppointmentDetails {
    pub id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration: i32,
    #[serde(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient: PatientSummary,
}

/// Flat row shape for the appointment-with-patient join; regrouped into
/// [`AppointmentDetails`] before leaving the service.
#[derive(FromRow)]
pub(crate) struct AppointmentWithPatientRow {
    pub id: Uuid,
    pub appointment_date: NaiveDate,
    pub appointment_time: NaiveTime,
    pub duration: i32,
    #[sqlx(rename = "type")]
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
    pub reason: Option<String>,
    pub diagnosis: Option<String>,
    pub treatment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub patient_id: Uuid,
    pub patient_username: String,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub patient_dob: NaiveDate,
    pub patient_gender: Gender,
}

impl From<AppointmentWithPatientRow> for AppointmentDetails {
    fn from(row: AppointmentWithPatientRow) -> Self {
        AppointmentDetails {
            id: row.id,
            appointment_date: row.appointment_date,
            appointment_time: row.appointment_time,
            duration: row.duration,
            appointment_type: row.appointment_type,
            status: row.status,
            notes: row.notes,
            reason: row.reason,
            diagnosis: row.diagnosis,
            treatment: row.treatment,
            created_at: row.created_at,
            updated_at: row.updated_at,
            patient: PatientSummary {
                id: row.patient_id,
                username: row.patient_username,
                first_name: row.patient_first_name,
                last_name: row.patient_last_name,
                dob: row.patient_dob,
                gender: row.patient_gender,
            },
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedAppointmentsResponse {
    pub result: Vec<AppointmentDetails>,
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_dto(time: &str) -> CreateAppointmentDto {
        CreateAppointmentDto {
            appointment_date: NaiveDate::from_ymd_opt(2030, 6, 1).unwrap(),
            appointment_time: time.to_string(),
            appointment_type: AppointmentType::Checkup,
            user_id: Uuid::new_v4(),
            reason: None,
        }
    }

    #[test]
    fn accepts_valid_time() {
        assert!(create_dto("09:30").validate().is_ok());
        assert!(create_dto("23:59").validate().is_ok());
    }

    #[test]
    fn rejects_malformed_time() {
        assert!(create_dto("9:30am").validate().is_err());
        assert!(create_dto("25:00").validate().is_err());
        assert!(create_dto("").validate().is_err());
    }

    #[test]
    fn enums_serialize_snake_case() {
        assert_eq!(
            serde_json::to_string(&AppointmentType::FollowUp).unwrap(),
            r#""follow_up""#
        );
        assert_eq!(
            serde_json::to_string(&AppointmentStatus::NoShow).unwrap(),
            r#""no_show""#
        );
    }

    #[test]
    fn defaults_match_new_appointments() {
        assert_eq!(AppointmentType::default(), AppointmentType::Consultation);
        assert_eq!(AppointmentStatus::default(), AppointmentStatus::Scheduled);
    }
}
