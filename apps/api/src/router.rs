use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::{appointment_routes, slot_admin_routes};
use booking_cell::state::BookingCellState;
use chat_cell::router::{message_routes, socket_routes};
use chat_cell::services::channel::ChatChannel;
use doctor_cell::router::doctor_routes;
use doctor_cell::services::directory::DoctorDirectory;
use hospital_cell::handlers::HospitalCellState;
use hospital_cell::router::hospital_routes;
use hospital_cell::services::directory::HospitalDirectory;
use patient_cell::router::patient_routes;
use patient_cell::services::directory::PatientDirectory;
use shared_config::AppConfig;
use triage_cell::router::triage_routes;

pub struct Cells {
    pub config: Arc<AppConfig>,
    pub hospitals: Arc<HospitalDirectory>,
    pub doctors: Arc<DoctorDirectory>,
    pub patients: Arc<PatientDirectory>,
    pub booking: Arc<BookingCellState>,
    pub chat: ChatChannel,
}

pub fn create_router(cells: Cells) -> Router {
    let hospital_state = HospitalCellState {
        hospitals: Arc::clone(&cells.hospitals),
        doctors: Arc::clone(&cells.doctors),
    };

    // Window deletion is part of the doctor surface but owned by the booking
    // cell (it enforces the in-use check).
    let doctor_surface = doctor_routes(Arc::clone(&cells.doctors), Arc::clone(&cells.config))
        .merge(slot_admin_routes(
            Arc::clone(&cells.booking),
            Arc::clone(&cells.config),
        ));

    Router::new()
        .route("/", get(|| async { "HealthNet API is running!" }))
        .nest("/hospital", hospital_routes(hospital_state))
        .nest("/doctor", doctor_surface)
        .nest("/patient", patient_routes(cells.patients, Arc::clone(&cells.config)))
        .nest("/appointment", appointment_routes(cells.booking, Arc::clone(&cells.config)))
        .nest("/triage", triage_routes(Arc::clone(&cells.config)))
        .nest("/message", message_routes(cells.chat.clone(), cells.config))
        .nest("/ws", socket_routes(cells.chat))
}
