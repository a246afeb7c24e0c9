// libs/doctor-cell/src/services/availability.rs
use chrono::{NaiveTime, Utc};
use regex::Regex;
use tracing::debug;
use uuid::Uuid;

use crate::models::{AvailabilityError, CreateTimeSlotRequest, DayOfWeek, TimeSlot};
use crate::services::directory::DoctorDirectory;

/// Creates and validates recurring availability windows.
pub struct AvailabilityService {
    directory: DoctorDirectory,
}

/// Parse and validate a window's time range. Times must be strict 24-hour
/// "HH:mm" and start must precede end.
pub fn validate_window(
    start_time: &str,
    end_time: &str,
) -> Result<(NaiveTime, NaiveTime), AvailabilityError> {
    let start = parse_hhmm(start_time)?;
    let end = parse_hhmm(end_time)?;

    if start >= end {
        return Err(AvailabilityError::InvalidRange);
    }

    Ok((start, end))
}

fn parse_hhmm(value: &str) -> Result<NaiveTime, AvailabilityError> {
    // Strict zero-padded form; chrono alone would also admit "9:5".
    static HHMM: std::sync::OnceLock<Regex> = std::sync::OnceLock::new();
    let format = HHMM.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d$").expect("valid pattern"));
    if !format.is_match(value) {
        return Err(AvailabilityError::InvalidTime(value.to_string()));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AvailabilityError::InvalidTime(value.to_string()))
}

impl AvailabilityService {
    pub fn new(directory: DoctorDirectory) -> Self {
        Self { directory }
    }

    /// Create an availability window for a doctor. Rejects malformed times,
    /// inverted ranges, and overlap with the doctor's existing windows on the
    /// same day.
    pub async fn create_window(
        &self,
        doctor_id: Uuid,
        request: CreateTimeSlotRequest,
    ) -> Result<TimeSlot, AvailabilityError> {
        debug!("Creating availability window for doctor {}", doctor_id);

        if self.directory.get(doctor_id).await.is_none() {
            return Err(AvailabilityError::DoctorNotFound);
        }

        let day: DayOfWeek = request
            .day_of_week
            .parse()
            .map_err(AvailabilityError::Validation)?;
        let (start, end) = validate_window(&request.start_time, &request.end_time)?;

        let existing = self.directory.slots_for_doctor(doctor_id).await;
        let overlaps = existing
            .iter()
            .any(|slot| slot.day_of_week == day && start < slot.end_time && end > slot.start_time);
        if overlaps {
            return Err(AvailabilityError::Overlap);
        }

        let slot = TimeSlot {
            id: Uuid::new_v4(),
            doctor_id,
            day_of_week: day,
            start_time: start,
            end_time: end,
            created_at: Utc::now(),
        };

        self.directory.insert_slot(slot.clone()).await;
        debug!("Availability window {} created for doctor {}", slot.id, doctor_id);

        Ok(slot)
    }

    pub async fn windows_for_doctor(&self, doctor_id: Uuid) -> Result<Vec<TimeSlot>, AvailabilityError> {
        if self.directory.get(doctor_id).await.is_none() {
            return Err(AvailabilityError::DoctorNotFound);
        }
        Ok(self.directory.slots_for_doctor(doctor_id).await)
    }
}
