// libs/booking-cell/src/services/lifecycle.rs
use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::models::{Appointment, AppointmentStatus, AppointmentView, BookingError, UpdateConsultationRequest};
use crate::state::BookingCellState;

/// Owns appointment status transitions and the listing queries.
pub struct AppointmentLifecycleService {
    state: BookingCellState,
}

/// All statuses legally reachable from `current`.
pub fn valid_transitions(current: AppointmentStatus) -> &'static [AppointmentStatus] {
    match current {
        AppointmentStatus::Pending => &[AppointmentStatus::Confirmed, AppointmentStatus::Cancelled],
        AppointmentStatus::Confirmed => {
            &[AppointmentStatus::Completed, AppointmentStatus::Cancelled]
        }
        // Terminal states.
        AppointmentStatus::Completed => &[],
        AppointmentStatus::Cancelled => &[],
    }
}

pub fn validate_transition(
    current: AppointmentStatus,
    next: AppointmentStatus,
) -> Result<(), BookingError> {
    debug!("Validating status transition {} -> {}", current, next);

    if !valid_transitions(current).contains(&next) {
        warn!("Invalid status transition attempted: {} -> {}", current, next);
        return Err(BookingError::InvalidTransition(current));
    }

    Ok(())
}

impl AppointmentLifecycleService {
    pub fn new(state: &BookingCellState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    pub async fn get(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        self.state
            .appointments
            .find_one(|a| a.id == appointment_id)
            .await
            .ok_or(BookingError::NotFound)
    }

    /// Cancel an appointment. Legal from `pending` and `confirmed`;
    /// cancelling a completed or already-cancelled appointment fails rather
    /// than silently succeeding. The freed slot becomes resolvable again
    /// immediately.
    pub async fn cancel(&self, appointment_id: Uuid) -> Result<Appointment, BookingError> {
        self.transition(appointment_id, AppointmentStatus::Cancelled)
            .await
    }

    /// Advance along the forward chain pending -> confirmed -> completed.
    /// Cancellation goes through [`cancel`]; requesting it here is an invalid
    /// transition like any other non-forward step.
    pub async fn advance(
        &self,
        appointment_id: Uuid,
        target: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        let forward = matches!(
            target,
            AppointmentStatus::Confirmed | AppointmentStatus::Completed
        );
        if !forward {
            let current = self.get(appointment_id).await?.status;
            return Err(BookingError::InvalidTransition(current));
        }

        self.transition(appointment_id, target).await
    }

    /// Record the consultation outcome on an appointment without touching its
    /// status.
    pub async fn update_consultation(
        &self,
        appointment_id: Uuid,
        request: UpdateConsultationRequest,
    ) -> Result<Appointment, BookingError> {
        if let Some(rating) = request.rating {
            if !(1..=5).contains(&rating) {
                return Err(BookingError::Validation(
                    "Rating must be between 1 and 5".to_string(),
                ));
            }
        }

        self.state
            .appointments
            .update_one(
                |a| a.id == appointment_id,
                |a| {
                    if let Some(diagnosis) = request.diagnosis {
                        a.diagnosis = Some(diagnosis);
                    }
                    if let Some(prescription) = request.prescription {
                        a.prescription = Some(prescription);
                    }
                    if let Some(review) = request.review {
                        a.review = Some(review);
                    }
                    if let Some(rating) = request.rating {
                        a.rating = Some(rating);
                    }
                    a.updated_at = Utc::now();
                },
            )
            .await
            .ok_or(BookingError::NotFound)
    }

    /// Appointments for a patient, oldest date first.
    pub async fn list_by_patient(&self, patient_id: Uuid) -> Vec<Appointment> {
        let mut appointments = self
            .state
            .appointments
            .filter(|a| a.patient_id == patient_id)
            .await;
        sort_chronologically(&mut appointments);
        appointments
    }

    pub async fn list_by_doctor(&self, doctor_id: Uuid) -> Vec<Appointment> {
        let mut appointments = self
            .state
            .appointments
            .filter(|a| a.doctor_id == doctor_id)
            .await;
        sort_chronologically(&mut appointments);
        appointments
    }

    /// Appointments for a hospital with doctor, patient, and hospital records
    /// expanded, as the hospital dashboard consumes them.
    pub async fn list_by_hospital(&self, hospital_id: Uuid) -> Vec<AppointmentView> {
        let mut appointments = self
            .state
            .appointments
            .filter(|a| a.hospital_id == hospital_id)
            .await;
        sort_chronologically(&mut appointments);

        let hospital = self.state.hospitals.get(hospital_id).await;

        let mut views = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            let doctor = self.state.doctors.get(appointment.doctor_id).await;
            let patient = self.state.patients.get(appointment.patient_id).await;
            views.push(AppointmentView {
                appointment,
                doctor,
                patient,
                hospital: hospital.clone(),
            });
        }
        views
    }

    async fn transition(
        &self,
        appointment_id: Uuid,
        target: AppointmentStatus,
    ) -> Result<Appointment, BookingError> {
        // The transition check runs inside the store's write lock so a
        // concurrent status change cannot slip between check and mutation.
        let mut outcome: Result<(), BookingError> = Ok(());
        let updated = self
            .state
            .appointments
            .update_one(
                |a| a.id == appointment_id,
                |a| match validate_transition(a.status, target) {
                    Ok(()) => {
                        a.status = target;
                        a.updated_at = Utc::now();
                    }
                    Err(e) => outcome = Err(e),
                },
            )
            .await;

        let Some(appointment) = updated else {
            return Err(BookingError::NotFound);
        };
        outcome?;

        info!("Appointment {} transitioned to {}", appointment_id, target);
        Ok(appointment)
    }
}

fn sort_chronologically(appointments: &mut [Appointment]) {
    // Ascending by date; ties break by status, then by creation order.
    appointments.sort_by(|a, b| {
        a.appointment_date
            .cmp(&b.appointment_date)
            .then(a.status.cmp(&b.status))
            .then(a.created_at.cmp(&b.created_at))
    });
}
