// libs/booking-cell/src/models.rs
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use doctor_cell::models::Doctor;
use hospital_cell::models::Hospital;
use patient_cell::models::Patient;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub hospital_id: Uuid,
    pub appointment_date: NaiveDate,
    pub time_slot_id: Uuid,
    pub status: AppointmentStatus,
    pub reason: String,
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub review: Option<String>,
    pub rating: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Closed status set. The legacy "scheduled" value is accepted on input as an
/// alias of `Pending` and never emitted. Declaration order is the sort order
/// used to break listing ties.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[serde(alias = "scheduled")]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    /// Whether an appointment in this status consumes its slot. Cancelled
    /// appointments immediately free the slot for resolution.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Completed | AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAppointmentRequest {
    pub patient_id: Uuid,
    pub hospital_id: Uuid,
    pub department: String,
    pub doctor_id: Uuid,
    pub appointment_date: NaiveDate,
    pub time_slot_id: Uuid,
    pub reason: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
}

/// Consultation record written by the doctor after (or during) the visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConsultationRequest {
    pub diagnosis: Option<String>,
    pub prescription: Option<String>,
    pub review: Option<String>,
    pub rating: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvanceStatusRequest {
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AvailableSlotsQuery {
    pub doctor_id: Uuid,
    pub date: NaiveDate,
}

/// Appointment with its referenced records expanded, as the hospital
/// dashboard consumes it.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub doctor: Option<Doctor>,
    pub patient: Option<Patient>,
    pub hospital: Option<Hospital>,
}

// ==============================================================================
// POLICY AND ERRORS
// ==============================================================================

/// Workflow-boundary booking policy. Weekend blocking lives here, not in the
/// slot resolver: a window configured for Saturday stays resolvable, the
/// workflow decides whether patients may pick that date.
#[derive(Debug, Clone)]
pub struct BookingPolicy {
    pub weekend_booking_allowed: bool,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            weekend_booking_allowed: false,
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BookingError {
    #[error("Appointment not found")]
    NotFound,

    #[error("Patient not found")]
    PatientNotFound,

    #[error("Doctor not found")]
    DoctorNotFound,

    #[error("Hospital not found")]
    HospitalNotFound,

    #[error("Time slot not found")]
    SlotNotFound,

    #[error("Time slot is no longer available")]
    SlotUnavailable,

    #[error("Invalid status transition from {0}")]
    InvalidTransition(AppointmentStatus),

    #[error("Validation error: {0}")]
    Validation(String),
}
