use std::sync::Arc;

use axum::{extract::{Extension, State}, Json};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::AuthUser;
use shared_models::error::AppError;

use crate::models::{TriageError, TriageRequest};
use crate::services::assessment::TriageService;

#[axum::debug_handler]
pub async fn assess_symptoms(
    State(config): State<Arc<AppConfig>>,
    Extension(_user): Extension<AuthUser>,
    Json(request): Json<TriageRequest>,
) -> Result<Json<Value>, AppError> {
    let service = TriageService::new(&config);

    let assessment = service
        .assess(&request.symptoms)
        .await
        .map_err(|e| match e {
            TriageError::Validation(msg) => AppError::BadRequest(msg),
            TriageError::NotConfigured => {
                AppError::ExternalService("Triage service not configured".to_string())
            }
            TriageError::Upstream(msg) | TriageError::InvalidResponse(msg) => {
                AppError::ExternalService(msg)
            }
        })?;

    Ok(Json(json!(assessment)))
}
