use tracing::debug;
use uuid::Uuid;

use shared_store::Collection;

use crate::models::{Doctor, TimeSlot};

/// Doctor records and their availability windows. All queries take explicit
/// parameters; callers never filter fetched-out collections themselves.
#[derive(Clone, Default)]
pub struct DoctorDirectory {
    doctors: Collection<Doctor>,
    slots: Collection<TimeSlot>,
}

impl DoctorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, doctor: Doctor) {
        debug!("Registering doctor {}", doctor.id);
        self.doctors.insert(doctor).await;
    }

    pub async fn get(&self, doctor_id: Uuid) -> Option<Doctor> {
        self.doctors.find_one(|d| d.id == doctor_id).await
    }

    pub async fn get_by_user(&self, user_id: Uuid) -> Option<Doctor> {
        self.doctors.find_one(|d| d.user_id == user_id).await
    }

    pub async fn list(&self) -> Vec<Doctor> {
        self.doctors.all().await
    }

    pub async fn list_for_hospital(&self, hospital_id: Uuid) -> Vec<Doctor> {
        self.doctors.filter(|d| d.hospital_id == hospital_id).await
    }

    pub async fn list_for_department(&self, hospital_id: Uuid, department: &str) -> Vec<Doctor> {
        self.doctors
            .filter(|d| d.hospital_id == hospital_id && d.department == department)
            .await
    }

    /// Distinct department names across a hospital's staff, in registration
    /// order.
    pub async fn departments_for_hospital(&self, hospital_id: Uuid) -> Vec<String> {
        let mut departments: Vec<String> = Vec::new();
        for doctor in self.list_for_hospital(hospital_id).await {
            if !departments.contains(&doctor.department) {
                departments.push(doctor.department);
            }
        }
        departments
    }

    pub async fn insert_slot(&self, slot: TimeSlot) {
        self.slots.insert(slot).await;
    }

    pub async fn slot(&self, slot_id: Uuid) -> Option<TimeSlot> {
        self.slots.find_one(|s| s.id == slot_id).await
    }

    /// A doctor's windows in the order they were configured.
    pub async fn slots_for_doctor(&self, doctor_id: Uuid) -> Vec<TimeSlot> {
        self.slots.filter(|s| s.doctor_id == doctor_id).await
    }

    pub async fn remove_slot_if<F>(
        &self,
        slot_id: Uuid,
        allow: F,
    ) -> Result<Option<TimeSlot>, shared_store::StoreError>
    where
        F: FnOnce(&TimeSlot) -> bool,
    {
        self.slots.remove_one_if(|s| s.id == slot_id, allow).await
    }
}
