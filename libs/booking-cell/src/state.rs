use std::sync::Arc;

use doctor_cell::services::directory::DoctorDirectory;
use hospital_cell::services::directory::HospitalDirectory;
use patient_cell::services::directory::PatientDirectory;
use shared_store::Collection;

use crate::models::{Appointment, BookingPolicy};

/// Shared handles for the booking cell: the appointment collection plus the
/// directories it validates references against.
#[derive(Clone)]
pub struct BookingCellState {
    pub appointments: Collection<Appointment>,
    pub doctors: Arc<DoctorDirectory>,
    pub patients: Arc<PatientDirectory>,
    pub hospitals: Arc<HospitalDirectory>,
    pub policy: BookingPolicy,
}

impl BookingCellState {
    pub fn new(
        doctors: Arc<DoctorDirectory>,
        patients: Arc<PatientDirectory>,
        hospitals: Arc<HospitalDirectory>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            appointments: Collection::new(),
            doctors,
            patients,
            hospitals,
            policy,
        }
    }
}
