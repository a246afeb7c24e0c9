// libs/booking-cell/src/services/workflow.rs
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

use doctor_cell::models::{DayOfWeek, TimeSlot};

use crate::models::{BookingError, BookingPolicy};

/// The multi-step booking flow as an explicit state machine. Every transition
/// consumes the workflow and returns a new one, so each step can be validated
/// and tested in isolation; there is no ambient form state.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingWorkflow {
    patient_id: Uuid,
    hospital_id: Uuid,
    stage: Stage,
}

#[derive(Debug, Clone, PartialEq)]
enum Stage {
    SelectingDepartment,
    SelectingDoctor {
        department: String,
    },
    SelectingDate {
        department: String,
        doctor_id: Uuid,
    },
    SelectingSlot {
        department: String,
        doctor_id: Uuid,
        date: NaiveDate,
    },
    EnteringReason {
        department: String,
        doctor_id: Uuid,
        date: NaiveDate,
        slot_id: Uuid,
    },
    Submitted {
        appointment_id: Uuid,
    },
}

/// Everything the workflow collected, ready for the commit step.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub patient_id: Uuid,
    pub hospital_id: Uuid,
    pub department: String,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub slot_id: Uuid,
    pub reason: String,
}

impl BookingWorkflow {
    pub fn new(patient_id: Uuid, hospital_id: Uuid) -> Self {
        Self {
            patient_id,
            hospital_id,
            stage: Stage::SelectingDepartment,
        }
    }

    /// Choose a department from the hospital's offered set.
    pub fn select_department(
        mut self,
        department: &str,
        offered: &[String],
    ) -> Result<Self, BookingError> {
        let Stage::SelectingDepartment = self.stage else {
            return Err(self.out_of_order("department"));
        };

        let department = department.trim();
        if department.is_empty() {
            return Err(BookingError::Validation("Department is required".to_string()));
        }
        if !offered.iter().any(|d| d == department) {
            return Err(BookingError::Validation(format!(
                "Department {} is not offered at this hospital",
                department
            )));
        }

        self.stage = Stage::SelectingDoctor {
            department: department.to_string(),
        };
        Ok(self)
    }

    /// Choose a doctor from the department's candidate set. Clears any
    /// previously chosen date and slot by construction.
    pub fn select_doctor(mut self, doctor_id: Uuid, candidates: &[Uuid]) -> Result<Self, BookingError> {
        let department = match self.stage {
            Stage::SelectingDoctor { department }
            // Re-selection from a later stage discards the date and slot.
            | Stage::SelectingDate { department, .. }
            | Stage::SelectingSlot { department, .. }
            | Stage::EnteringReason { department, .. } => department,
            _ => {
                return Err(BookingError::Validation(
                    "Select a department before choosing a doctor".to_string(),
                ))
            }
        };

        if !candidates.contains(&doctor_id) {
            return Err(BookingError::Validation(
                "Doctor is not part of the selected department".to_string(),
            ));
        }

        self.stage = Stage::SelectingDate {
            department,
            doctor_id,
        };
        Ok(self)
    }

    /// Accept a calendar date: never in the past, and weekends only when the
    /// policy allows them. Clears any previously chosen slot.
    pub fn select_date(
        mut self,
        date: NaiveDate,
        today: NaiveDate,
        policy: &BookingPolicy,
    ) -> Result<Self, BookingError> {
        let (department, doctor_id) = match self.stage {
            Stage::SelectingDate { department, doctor_id }
            | Stage::SelectingSlot { department, doctor_id, .. }
            | Stage::EnteringReason { department, doctor_id, .. } => (department, doctor_id),
            _ => {
                return Err(BookingError::Validation(
                    "Select a doctor before choosing a date".to_string(),
                ))
            }
        };

        if date < today {
            return Err(BookingError::Validation(
                "Appointment date cannot be in the past".to_string(),
            ));
        }
        if !policy.weekend_booking_allowed && DayOfWeek::from(date.weekday()).is_weekend() {
            return Err(BookingError::Validation(
                "Appointments cannot be booked on weekends".to_string(),
            ));
        }

        self.stage = Stage::SelectingSlot {
            department,
            doctor_id,
            date,
        };
        Ok(self)
    }

    /// Choose one slot out of the resolved set for the chosen date. A slot
    /// absent from the set was taken between resolution and selection.
    pub fn select_slot(mut self, slot_id: Uuid, resolved: &[TimeSlot]) -> Result<Self, BookingError> {
        let (department, doctor_id, date) = match self.stage {
            Stage::SelectingSlot { department, doctor_id, date }
            | Stage::EnteringReason { department, doctor_id, date, .. } => {
                (department, doctor_id, date)
            }
            _ => {
                return Err(BookingError::Validation(
                    "Select a date before choosing a time slot".to_string(),
                ))
            }
        };

        if !resolved.iter().any(|slot| slot.id == slot_id) {
            return Err(BookingError::SlotUnavailable);
        }

        self.stage = Stage::EnteringReason {
            department,
            doctor_id,
            date,
            slot_id,
        };
        Ok(self)
    }

    /// Final step: a non-empty reason completes the draft handed to the
    /// commit path.
    pub fn enter_reason(self, reason: &str) -> Result<BookingDraft, BookingError> {
        let Stage::EnteringReason {
            department,
            doctor_id,
            date,
            slot_id,
        } = self.stage
        else {
            return Err(BookingError::Validation(
                "Choose a time slot before submitting".to_string(),
            ));
        };

        let reason = reason.trim();
        if reason.is_empty() {
            return Err(BookingError::Validation(
                "Reason for visit is required".to_string(),
            ));
        }

        Ok(BookingDraft {
            patient_id: self.patient_id,
            hospital_id: self.hospital_id,
            department,
            doctor_id,
            date,
            slot_id,
            reason: reason.to_string(),
        })
    }

    /// Mark the workflow as completed with the persisted appointment.
    pub fn submitted(mut self, appointment_id: Uuid) -> Self {
        self.stage = Stage::Submitted { appointment_id };
        self
    }

    /// Step one stage backward, discarding later selections so stale choices
    /// can never leak into a submission.
    pub fn back(mut self) -> Self {
        self.stage = match self.stage {
            Stage::SelectingDepartment => Stage::SelectingDepartment,
            Stage::SelectingDoctor { .. } => Stage::SelectingDepartment,
            Stage::SelectingDate { department, .. } => Stage::SelectingDoctor { department },
            Stage::SelectingSlot { department, doctor_id, .. } => Stage::SelectingDate {
                department,
                doctor_id,
            },
            Stage::EnteringReason { department, doctor_id, date, .. } => Stage::SelectingSlot {
                department,
                doctor_id,
                date,
            },
            submitted @ Stage::Submitted { .. } => submitted,
        };
        self
    }

    pub fn is_submitted(&self) -> bool {
        matches!(self.stage, Stage::Submitted { .. })
    }

    pub fn appointment_id(&self) -> Option<Uuid> {
        match self.stage {
            Stage::Submitted { appointment_id } => Some(appointment_id),
            _ => None,
        }
    }

    fn out_of_order(&self, input: &str) -> BookingError {
        BookingError::Validation(format!("Unexpected {} input for the current step", input))
    }
}
