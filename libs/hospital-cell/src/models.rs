use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::models::Doctor;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hospital {
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub specialty: String,
    pub bed_total: i32,
    pub bed_available: i32,
    pub is_icu_available: bool,
    pub icu_total: i32,
    pub icu_available: i32,
    pub phone: String,
    pub email: String,
    pub image: Option<String>,
    pub rating: Option<f32>,
    pub created_at: DateTime<Utc>,
}

/// Explicit query parameters for the hospital listing; filtering happens at
/// the directory boundary, not in callers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HospitalSearchFilters {
    pub city: Option<String>,
    pub specialty: Option<String>,
    pub search: Option<String>,
}

/// Hospital detail with its staff, as the booking page consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct HospitalDetail {
    pub hospital: Hospital,
    pub staff: Vec<Doctor>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum HospitalError {
    #[error("Hospital not found")]
    NotFound,
}
