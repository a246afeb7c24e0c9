use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub blood_group: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub user_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub blood_group: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum PatientError {
    #[error("Patient not found")]
    NotFound,

    #[error("Patient already registered for this user")]
    AlreadyRegistered,

    #[error("Validation error: {0}")]
    Validation(String),
}
