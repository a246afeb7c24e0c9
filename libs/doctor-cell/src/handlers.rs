// libs/doctor-cell/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{
    AvailabilityError, CreateDoctorRequest, CreateTimeSlotRequest, Doctor, DoctorWithSlots,
};
use crate::services::availability::AvailabilityService;
use crate::services::directory::DoctorDirectory;

fn availability_error(e: AvailabilityError) -> AppError {
    match e {
        AvailabilityError::DoctorNotFound => AppError::NotFound("Doctor not found".to_string()),
        AvailabilityError::SlotNotFound => AppError::NotFound("Time slot not found".to_string()),
        AvailabilityError::InvalidTime(t) => {
            AppError::BadRequest(format!("Invalid time format: {}", t))
        }
        AvailabilityError::InvalidRange => {
            AppError::BadRequest("Start time must be before end time".to_string())
        }
        AvailabilityError::Overlap => {
            AppError::BadRequest("Window overlaps an existing schedule for this day".to_string())
        }
        AvailabilityError::Validation(msg) => AppError::BadRequest(msg),
    }
}

#[axum::debug_handler]
pub async fn list_doctors(
    State(directory): State<Arc<DoctorDirectory>>,
) -> Result<Json<Value>, AppError> {
    let doctors = directory.list().await;
    Ok(Json(json!({
        "doctors": doctors,
        "total": doctors.len()
    })))
}

/// Doctor detail with its availability windows expanded.
#[axum::debug_handler]
pub async fn get_doctor(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<DoctorWithSlots>, AppError> {
    let doctor = directory
        .get(doctor_id)
        .await
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;
    let available_time_slots = directory.slots_for_doctor(doctor_id).await;

    Ok(Json(DoctorWithSlots {
        doctor,
        available_time_slots,
    }))
}

/// Register a doctor. Admin/seed action.
#[axum::debug_handler]
pub async fn create_doctor(
    State(directory): State<Arc<DoctorDirectory>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateDoctorRequest>,
) -> Result<Json<Value>, AppError> {
    if !user.is_admin() {
        return Err(AppError::Auth("Not authorized to register doctors".to_string()));
    }

    if request.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("Doctor name is required".to_string()));
    }

    let doctor = Doctor {
        id: Uuid::new_v4(),
        user_id: request.user_id,
        full_name: request.full_name,
        hospital_id: request.hospital_id,
        department: request.department,
        specialty: request.specialty,
        experience_years: request.experience_years,
        phone: request.phone,
        created_at: Utc::now(),
    };
    directory.insert(doctor.clone()).await;

    Ok(Json(json!({
        "success": true,
        "doctor": doctor
    })))
}

/// Set up an availability window for a doctor. Only the doctor themselves or
/// an admin may change a schedule.
#[axum::debug_handler]
pub async fn create_time_slot(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateTimeSlotRequest>,
) -> Result<Json<Value>, AppError> {
    let doctor = directory
        .get(doctor_id)
        .await
        .ok_or_else(|| AppError::NotFound("Doctor not found".to_string()))?;

    let is_owner = doctor.user_id.to_string() == user.id;
    if !is_owner && !user.is_admin() {
        return Err(AppError::Auth(
            "Not authorized to manage this doctor's schedule".to_string(),
        ));
    }

    let service = AvailabilityService::new((*directory).clone());
    let slot = service
        .create_window(doctor_id, request)
        .await
        .map_err(availability_error)?;

    Ok(Json(json!({
        "success": true,
        "time_slot": slot
    })))
}

#[axum::debug_handler]
pub async fn list_time_slots(
    State(directory): State<Arc<DoctorDirectory>>,
    Path(doctor_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new((*directory).clone());
    let slots = service
        .windows_for_doctor(doctor_id)
        .await
        .map_err(availability_error)?;

    Ok(Json(json!({
        "doctor_id": doctor_id,
        "available_time_slots": slots
    })))
}
