// libs/booking-cell/src/router.rs
use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::state::BookingCellState;

pub fn appointment_routes(state: Arc<BookingCellState>, config: Arc<AppConfig>) -> Router {
    // Every appointment operation requires an authenticated caller.
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/available-slots", get(handlers::get_available_slots))
        .route("/get-patient-appointment/{user_id}", get(handlers::get_patient_appointments))
        .route("/get-doctor-appointment/{doctor_id}", get(handlers::get_doctor_appointments))
        .route("/get-hospital-appointment/{hospital_id}", get(handlers::get_hospital_appointments))
        .route("/{appointment_id}", get(handlers::get_appointment))
        .route("/{appointment_id}", put(handlers::update_consultation))
        .route("/{appointment_id}/cancel", post(handlers::cancel_appointment))
        .route("/{appointment_id}/status", post(handlers::advance_appointment))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}

/// Window deletion is mounted under the doctor surface by the app router; it
/// lives in this cell because the in-use check is a booking invariant.
pub fn slot_admin_routes(state: Arc<BookingCellState>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/time-slots/{slot_id}", delete(handlers::delete_time_slot))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(state)
}
