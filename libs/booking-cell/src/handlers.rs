// libs/booking-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{
    AdvanceStatusRequest, Appointment, AvailableSlotsQuery, BookingError,
    SubmitAppointmentRequest, UpdateConsultationRequest,
};
use crate::services::booking::BookingService;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::state::BookingCellState;

fn booking_error(e: BookingError) -> AppError {
    match e {
        BookingError::NotFound => AppError::NotFound("Appointment not found".to_string()),
        BookingError::PatientNotFound => AppError::NotFound("Patient not found".to_string()),
        BookingError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        BookingError::HospitalNotFound => AppError::NotFound("Hospital not found".to_string()),
        BookingError::SlotNotFound => AppError::NotFound("Time slot not found".to_string()),
        BookingError::SlotUnavailable => {
            AppError::Conflict("Time slot is no longer available".to_string())
        }
        BookingError::InvalidTransition(status) => {
            AppError::BadRequest(format!("Cannot change appointment in status: {}", status))
        }
        BookingError::Validation(msg) => AppError::BadRequest(msg),
    }
}

/// Whether `user` is the patient or the doctor on `appointment`, looked up
/// through the owning user ids.
async fn involvement(
    state: &BookingCellState,
    appointment: &Appointment,
    user: &AuthUser,
) -> (bool, bool) {
    let is_patient = match state.patients.get(appointment.patient_id).await {
        Some(patient) => patient.user_id.to_string() == user.id,
        None => false,
    };
    let is_doctor = match state.doctors.get(appointment.doctor_id).await {
        Some(doctor) => doctor.user_id.to_string() == user.id,
        None => false,
    };
    (is_patient, is_doctor)
}

/// Create an appointment: the single mutating operation of the booking core.
#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<BookingCellState>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<SubmitAppointmentRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let patient = state
        .patients
        .get(request.patient_id)
        .await
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

    let is_self = patient.user_id.to_string() == user.id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to book appointment for this patient".to_string(),
        ));
    }

    let service = BookingService::new(&state);
    let appointment = service
        .submit_appointment(request)
        .await
        .map_err(booking_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "appointment": appointment,
            "message": "Appointment booked successfully"
        })),
    ))
}

/// Bookable windows for a doctor on a date. Advisory: the authoritative check
/// happens again at submission.
#[axum::debug_handler]
pub async fn get_available_slots(
    State(state): State<Arc<BookingCellState>>,
    Query(query): Query<AvailableSlotsQuery>,
    Extension(_user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let service = BookingService::new(&state);
    let slots = service
        .resolve_slots(query.doctor_id, query.date)
        .await
        .map_err(booking_error)?;

    Ok(Json(json!({
        "doctor_id": query.doctor_id,
        "date": query.date,
        "available_slots": slots
    })))
}

#[axum::debug_handler]
pub async fn get_appointment(
    State(state): State<Arc<BookingCellState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = AppointmentLifecycleService::new(&state);
    let appointment = lifecycle.get(appointment_id).await.map_err(booking_error)?;

    let (is_patient, is_doctor) = involvement(&state, &appointment, &user).await;
    if !is_patient && !is_doctor && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to view this appointment".to_string()));
    }

    Ok(Json(json!(appointment)))
}

/// Appointments for the patient owned by `user_id`, oldest first.
#[axum::debug_handler]
pub async fn get_patient_appointments(
    State(state): State<Arc<BookingCellState>>,
    Path(user_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let is_self = user_id.to_string() == user.id;
    if !is_self && !user.is_admin() && !user.is_doctor() {
        return Err(AppError::Auth(
            "Not authorized to view appointments for this patient".to_string(),
        ));
    }

    let patient = state
        .patients
        .get_by_user(user_id)
        .await
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

    let lifecycle = AppointmentLifecycleService::new(&state);
    let appointments = lifecycle.list_by_patient(patient.id).await;

    Ok(Json(json!({
        "patient_id": patient.id,
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn get_doctor_appointments(
    State(state): State<Arc<BookingCellState>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let doctor = state
        .doctors
        .get(doctor_id)
        .await
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

    let is_self = doctor.user_id.to_string() == user.id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to view appointments for this doctor".to_string(),
        ));
    }

    let lifecycle = AppointmentLifecycleService::new(&state);
    let appointments = lifecycle.list_by_doctor(doctor_id).await;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "appointments": appointments,
        "total": appointments.len()
    })))
}

/// Hospital-wide appointment listing with doctor/patient/hospital expanded.
#[axum::debug_handler]
pub async fn get_hospital_appointments(
    State(state): State<Arc<BookingCellState>>,
    Path(hospital_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    if !user.is_admin() && !user.is_doctor() {
        return Err(AppError::Auth(
            "Not authorized to view hospital appointments".to_string(),
        ));
    }

    if state.hospitals.get(hospital_id).await.is_none() {
        return Err(AppError::NotFound("Hospital not found".to_string()));
    }

    let lifecycle = AppointmentLifecycleService::new(&state);
    let appointments = lifecycle.list_by_hospital(hospital_id).await;

    Ok(Json(json!({
        "hospital_id": hospital_id,
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(state): State<Arc<BookingCellState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = AppointmentLifecycleService::new(&state);
    let appointment = lifecycle.get(appointment_id).await.map_err(booking_error)?;

    let (is_patient, is_doctor) = involvement(&state, &appointment, &user).await;
    if !is_patient && !is_doctor && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to cancel this appointment".to_string()));
    }

    let cancelled = lifecycle.cancel(appointment_id).await.map_err(booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": cancelled,
        "message": "Appointment cancelled successfully"
    })))
}

/// Move an appointment forward along pending -> confirmed -> completed.
/// Doctor/staff action.
#[axum::debug_handler]
pub async fn advance_appointment(
    State(state): State<Arc<BookingCellState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<AdvanceStatusRequest>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = AppointmentLifecycleService::new(&state);
    let appointment = lifecycle.get(appointment_id).await.map_err(booking_error)?;

    let (_, is_doctor) = involvement(&state, &appointment, &user).await;
    if !is_doctor && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to update this appointment's status".to_string(),
        ));
    }

    let updated = lifecycle
        .advance(appointment_id, request.status)
        .await
        .map_err(booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": updated
    })))
}

/// Record diagnosis/prescription/review/rating on an appointment.
#[axum::debug_handler]
pub async fn update_consultation(
    State(state): State<Arc<BookingCellState>>,
    Path(appointment_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<UpdateConsultationRequest>,
) -> Result<Json<Value>, AppError> {
    let lifecycle = AppointmentLifecycleService::new(&state);
    let appointment = lifecycle.get(appointment_id).await.map_err(booking_error)?;

    let (is_patient, is_doctor) = involvement(&state, &appointment, &user).await;
    if !is_patient && !is_doctor && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to update this appointment".to_string()));
    }

    // Patients only contribute the review and rating.
    if is_patient && !is_doctor && !user.is_admin() {
        if request.diagnosis.is_some() || request.prescription.is_some() {
            return Err(AppError::Auth(
                "Patients cannot update diagnosis or prescription".to_string(),
            ));
        }
    }

    let updated = lifecycle
        .update_consultation(appointment_id, request)
        .await
        .map_err(booking_error)?;

    Ok(Json(json!({
        "success": true,
        "appointment": updated
    })))
}

/// Delete an availability window unless active appointments reference it.
/// Exposed on the doctor surface; lives here because the orphan-protection is
/// a booking invariant.
#[axum::debug_handler]
pub async fn delete_time_slot(
    State(state): State<Arc<BookingCellState>>,
    Path(slot_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let slot = state
        .doctors
        .slot(slot_id)
        .await
        .ok_or_else(|| AppError::NotFound("Time slot not found".to_string()))?;

    let owner = state.doctors.get(slot.doctor_id).await;
    let is_owner = owner
        .map(|d| d.user_id.to_string() == user.id)
        .unwrap_or(false);
    if !is_owner && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to manage this doctor's schedule".to_string(),
        ));
    }

    let service = BookingService::new(&state);
    let removed = service.delete_time_slot(slot_id).await.map_err(booking_error)?;

    Ok(Json(json!({
        "success": true,
        "deleted": removed,
        "message": "Time slot deleted successfully"
    })))
}
