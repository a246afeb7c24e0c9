use axum::{routing::get, Router};

use crate::handlers::{self, HospitalCellState};

pub fn hospital_routes(state: HospitalCellState) -> Router {
    // Discovery is public: patients browse hospitals before signing in.
    Router::new()
        .route("/", get(handlers::list_hospitals))
        .route("/{hospital_id}", get(handlers::get_hospital))
        .route("/{hospital_id}/departments", get(handlers::get_hospital_departments))
        .with_state(state)
}
