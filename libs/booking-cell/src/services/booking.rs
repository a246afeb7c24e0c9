// libs/booking-cell/src/services/booking.rs
use chrono::{Datelike, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use doctor_cell::models::{DayOfWeek, TimeSlot};

use crate::models::{Appointment, AppointmentStatus, BookingError, SubmitAppointmentRequest};
use crate::services::slots::resolve_available_slots;
use crate::services::workflow::BookingWorkflow;
use crate::state::BookingCellState;

/// Orchestrates slot resolution and appointment creation. Everything before
/// the final insert is advisory; the slot-free check is re-done atomically at
/// commit time.
pub struct BookingService {
    state: BookingCellState,
}

impl BookingService {
    pub fn new(state: &BookingCellState) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Bookable windows for a doctor on a date: the doctor's windows for that
    /// weekday minus the ones already consumed by a non-cancelled
    /// appointment.
    pub async fn resolve_slots(
        &self,
        doctor_id: Uuid,
        date: chrono::NaiveDate,
    ) -> Result<Vec<TimeSlot>, BookingError> {
        if self.state.doctors.get(doctor_id).await.is_none() {
            return Err(BookingError::DoctorNotFound);
        }

        let windows = self.state.doctors.slots_for_doctor(doctor_id).await;
        let existing = self
            .state
            .appointments
            .filter(|a| a.doctor_id == doctor_id && a.appointment_date == date)
            .await;

        let today = Utc::now().date_naive();
        Ok(resolve_available_slots(&windows, date, today, &existing))
    }

    /// Create an appointment. Drives the booking workflow end to end against
    /// the live candidate sets, then commits with an admission check held
    /// under the appointment collection's write lock, so two racing
    /// submissions for the same (doctor, date, slot) cannot both succeed.
    pub async fn submit_appointment(
        &self,
        request: SubmitAppointmentRequest,
    ) -> Result<Appointment, BookingError> {
        info!(
            "Booking appointment for patient {} with doctor {} on {}",
            request.patient_id, request.doctor_id, request.appointment_date
        );

        // Referenced records must exist before the workflow runs.
        let patient = self
            .state
            .patients
            .get(request.patient_id)
            .await
            .ok_or(BookingError::PatientNotFound)?;
        if self.state.hospitals.get(request.hospital_id).await.is_none() {
            return Err(BookingError::HospitalNotFound);
        }
        let doctor = self
            .state
            .doctors
            .get(request.doctor_id)
            .await
            .ok_or(BookingError::DoctorNotFound)?;
        if doctor.hospital_id != request.hospital_id {
            return Err(BookingError::Validation(
                "Doctor does not practice at this hospital".to_string(),
            ));
        }

        let slot = self
            .state
            .doctors
            .slot(request.time_slot_id)
            .await
            .ok_or(BookingError::SlotNotFound)?;
        if slot.doctor_id != request.doctor_id {
            return Err(BookingError::Validation(
                "Time slot does not belong to the selected doctor".to_string(),
            ));
        }
        if slot.day_of_week != DayOfWeek::from(request.appointment_date.weekday()) {
            return Err(BookingError::Validation(
                "Appointment date does not fall on the slot's day of week".to_string(),
            ));
        }

        // Walk the workflow with the live candidate sets; each step enforces
        // its own stage rules (offered department, candidate doctor, date
        // policy, resolved slot, non-empty reason).
        let departments = self
            .state
            .doctors
            .departments_for_hospital(request.hospital_id)
            .await;
        let candidates: Vec<Uuid> = self
            .state
            .doctors
            .list_for_department(request.hospital_id, request.department.trim())
            .await
            .into_iter()
            .map(|d| d.id)
            .collect();
        let resolved = self
            .resolve_slots(request.doctor_id, request.appointment_date)
            .await?;

        let today = Utc::now().date_naive();
        let draft = BookingWorkflow::new(request.patient_id, request.hospital_id)
            .select_department(&request.department, &departments)?
            .select_doctor(request.doctor_id, &candidates)?
            .select_date(request.appointment_date, today, &self.state.policy)?
            .select_slot(request.time_slot_id, &resolved)?
            .enter_reason(&request.reason)?;

        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            patient_id: draft.patient_id,
            doctor_id: draft.doctor_id,
            hospital_id: draft.hospital_id,
            appointment_date: draft.date,
            time_slot_id: draft.slot_id,
            status: AppointmentStatus::Pending,
            reason: draft.reason,
            diagnosis: request.diagnosis,
            prescription: None,
            review: None,
            rating: None,
            created_at: now,
            updated_at: now,
        };

        // Commit-time re-check: the resolve above was advisory. The admission
        // closure runs under the write lock, serializing racing submissions
        // for the same slot triple.
        let doctor_id = appointment.doctor_id;
        let date = appointment.appointment_date;
        let slot_id = appointment.time_slot_id;
        let created = self
            .state
            .appointments
            .insert_if(appointment, |existing| {
                !existing.iter().any(|a| {
                    a.doctor_id == doctor_id
                        && a.appointment_date == date
                        && a.time_slot_id == slot_id
                        && a.status.occupies_slot()
                })
            })
            .await
            .map_err(|_| {
                warn!(
                    "Slot {} for doctor {} on {} was taken at commit time",
                    slot_id, doctor_id, date
                );
                BookingError::SlotUnavailable
            })?;

        info!(
            "Appointment {} booked for patient {} ({})",
            created.id, patient.id, created.status
        );
        Ok(created)
    }

    /// Delete an availability window unless a non-cancelled appointment still
    /// references it. The usage check is computed immediately before the
    /// removal; bookings hold no lock across the two collections, so this is
    /// a best-effort guard rather than a cross-collection transaction.
    pub async fn delete_time_slot(&self, slot_id: Uuid) -> Result<TimeSlot, BookingError> {
        let in_use = self
            .state
            .appointments
            .find_one(|a| a.time_slot_id == slot_id && a.status.occupies_slot())
            .await
            .is_some();

        debug!("Deleting time slot {} (in use: {})", slot_id, in_use);

        let removed = self
            .state
            .doctors
            .remove_slot_if(slot_id, |_| !in_use)
            .await
            .map_err(|_| {
                BookingError::Validation(
                    "Time slot has active appointments and cannot be deleted".to_string(),
                )
            })?;

        removed.ok_or(BookingError::SlotNotFound)
    }
}
