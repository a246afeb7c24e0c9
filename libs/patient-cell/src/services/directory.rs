use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use shared_store::Collection;

use crate::models::{CreatePatientRequest, Patient, PatientError};

/// Patient records, keyed by record id and by the owning auth user.
#[derive(Clone, Default)]
pub struct PatientDirectory {
    patients: Collection<Patient>,
}

impl PatientDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a patient record. One record per auth user; the uniqueness
    /// check and the insert happen under the same write lock.
    pub async fn register(&self, request: CreatePatientRequest) -> Result<Patient, PatientError> {
        if request.full_name.trim().is_empty() {
            return Err(PatientError::Validation("Patient name is required".to_string()));
        }

        let patient = Patient {
            id: Uuid::new_v4(),
            user_id: request.user_id,
            full_name: request.full_name,
            phone: request.phone,
            date_of_birth: request.date_of_birth,
            blood_group: request.blood_group,
            address: request.address,
            city: request.city,
            state: request.state,
            created_at: Utc::now(),
        };

        let user_id = patient.user_id;
        let registered = self
            .patients
            .insert_if(patient, |existing| {
                !existing.iter().any(|p| p.user_id == user_id)
            })
            .await
            .map_err(|_| PatientError::AlreadyRegistered)?;

        debug!("Registered patient {} for user {}", registered.id, user_id);
        Ok(registered)
    }

    pub async fn insert(&self, patient: Patient) {
        self.patients.insert(patient).await;
    }

    pub async fn get(&self, patient_id: Uuid) -> Option<Patient> {
        self.patients.find_one(|p| p.id == patient_id).await
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Option<Patient> {
        self.patients.find_one(|p| p.user_id == user_id).await
    }

    pub async fn list(&self) -> Vec<Patient> {
        self.patients.all().await
    }
}
