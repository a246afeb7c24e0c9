use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{CreatePatientRequest, PatientError};
use crate::services::directory::PatientDirectory;

#[axum::debug_handler]
pub async fn create_patient(
    State(directory): State<Arc<PatientDirectory>>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreatePatientRequest>,
) -> Result<Json<Value>, AppError> {
    // A caller may register themselves; admins may register anyone.
    let is_self = request.user_id.to_string() == user.id;
    if !is_self && !user.is_admin() {
        return Err(AppError::Auth("Not authorized to register this patient".to_string()));
    }

    let patient = directory.register(request).await.map_err(|e| match e {
        PatientError::AlreadyRegistered => AppError::Conflict(e.to_string()),
        PatientError::Validation(msg) => AppError::BadRequest(msg),
        PatientError::NotFound => AppError::NotFound(e.to_string()),
    })?;

    Ok(Json(json!({
        "success": true,
        "patient": patient
    })))
}

/// Patient record for an auth user id, as the dashboard fetches it.
#[axum::debug_handler]
pub async fn get_patient_by_user(
    State(directory): State<Arc<PatientDirectory>>,
    Path(user_id): Path<Uuid>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    let is_self = user_id.to_string() == user.id;
    if !is_self && !user.is_admin() && !user.is_doctor() {
        return Err(AppError::Auth("Not authorized to view this patient".to_string()));
    }

    let patient = directory
        .get_by_user(user_id)
        .await
        .ok_or_else(|| AppError::NotFound("Patient not found".to_string()))?;

    Ok(Json(json!(patient)))
}

#[axum::debug_handler]
pub async fn list_patients(
    State(directory): State<Arc<PatientDirectory>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Value>, AppError> {
    if !user.is_admin() && !user.is_doctor() {
        return Err(AppError::Auth("Not authorized to list patients".to_string()));
    }

    let patients = directory.list().await;
    Ok(Json(json!({
        "patients": patients,
        "total": patients.len()
    })))
}
