use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;
use crate::services::directory::PatientDirectory;

pub fn patient_routes(directory: Arc<PatientDirectory>, config: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::create_patient))
        .route("/", get(handlers::list_patients))
        .route("/{user_id}", get(handlers::get_patient_by_user))
        .layer(middleware::from_fn_with_state(config, auth_middleware))
        .with_state(directory)
}
