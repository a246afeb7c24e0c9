use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use doctor_cell::services::directory::DoctorDirectory;
use shared_models::error::AppError;

use crate::models::{HospitalDetail, HospitalSearchFilters};
use crate::services::directory::HospitalDirectory;

/// Handler state: the hospital directory plus the doctor directory used to
/// expand staff on the detail view.
#[derive(Clone)]
pub struct HospitalCellState {
    pub hospitals: Arc<HospitalDirectory>,
    pub doctors: Arc<DoctorDirectory>,
}

#[axum::debug_handler]
pub async fn list_hospitals(
    State(state): State<HospitalCellState>,
    Query(filters): Query<HospitalSearchFilters>,
) -> Result<Json<Value>, AppError> {
    let hospitals = state.hospitals.list(&filters).await;
    Ok(Json(json!({
        "hospitals": hospitals,
        "total": hospitals.len()
    })))
}

/// Hospital detail with staff, as the booking page fetches it.
#[axum::debug_handler]
pub async fn get_hospital(
    State(state): State<HospitalCellState>,
    Path(hospital_id): Path<Uuid>,
) -> Result<Json<HospitalDetail>, AppError> {
    let hospital = state
        .hospitals
        .get(hospital_id)
        .await
        .ok_or_else(|| AppError::NotFound("Hospital not found".to_string()))?;
    let staff = state.doctors.list_for_hospital(hospital_id).await;

    Ok(Json(HospitalDetail { hospital, staff }))
}

/// Distinct departments across a hospital's staff; the first step of the
/// booking workflow chooses from this set.
#[axum::debug_handler]
pub async fn get_hospital_departments(
    State(state): State<HospitalCellState>,
    Path(hospital_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    if state.hospitals.get(hospital_id).await.is_none() {
        return Err(AppError::NotFound("Hospital not found".to_string()));
    }
    let departments = state.doctors.departments_for_hospital(hospital_id).await;

    Ok(Json(json!({
        "hospital_id": hospital_id,
        "departments": departments
    })))
}
