// libs/booking-cell/src/services/slots.rs
use chrono::{Datelike, NaiveDate};

use doctor_cell::models::{DayOfWeek, TimeSlot};

use crate::models::Appointment;

/// Resolve which of a doctor's windows are bookable on `date`.
///
/// `today` is passed in rather than read from the clock so the function stays
/// deterministic. Rules:
/// - dates strictly before `today` resolve to nothing;
/// - a window matches only when its day equals the date's weekday;
/// - a window already consumed by a non-cancelled appointment for this
///   doctor and date is excluded;
/// - surviving windows keep the doctor's configured order.
pub fn resolve_available_slots(
    windows: &[TimeSlot],
    date: NaiveDate,
    today: NaiveDate,
    existing: &[Appointment],
) -> Vec<TimeSlot> {
    if date < today {
        return Vec::new();
    }

    let day = DayOfWeek::from(date.weekday());

    windows
        .iter()
        .filter(|window| window.day_of_week == day)
        .filter(|window| {
            !existing.iter().any(|appointment| {
                appointment.doctor_id == window.doctor_id
                    && appointment.appointment_date == date
                    && appointment.time_slot_id == window.id
                    && appointment.status.occupies_slot()
            })
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveTime, Utc};
    use uuid::Uuid;

    use crate::models::AppointmentStatus;

    fn window(doctor_id: Uuid, day: DayOfWeek, start: &str, end: &str) -> TimeSlot {
        TimeSlot {
            id: Uuid::new_v4(),
            doctor_id,
            day_of_week: day,
            start_time: NaiveTime::parse_from_str(start, "%H:%M").unwrap(),
            end_time: NaiveTime::parse_from_str(end, "%H:%M").unwrap(),
            created_at: Utc::now(),
        }
    }

    fn appointment(
        doctor_id: Uuid,
        slot_id: Uuid,
        date: NaiveDate,
        status: AppointmentStatus,
    ) -> Appointment {
        Appointment {
            id: Uuid::new_v4(),
            patient_id: Uuid::new_v4(),
            doctor_id,
            hospital_id: Uuid::new_v4(),
            appointment_date: date,
            time_slot_id: slot_id,
            status,
            reason: "checkup".to_string(),
            diagnosis: None,
            prescription: None,
            review: None,
            rating: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    // 2025-03-10 is a Monday.
    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    #[test]
    fn returns_only_windows_matching_the_dates_weekday() {
        let doctor = Uuid::new_v4();
        let windows = vec![
            window(doctor, DayOfWeek::Monday, "09:00", "10:00"),
            window(doctor, DayOfWeek::Tuesday, "09:00", "10:00"),
            window(doctor, DayOfWeek::Monday, "14:00", "15:00"),
        ];

        let resolved = resolve_available_slots(&windows, monday(), today(), &[]);
        assert_eq!(resolved.len(), 2);
        assert!(resolved.iter().all(|w| w.day_of_week == DayOfWeek::Monday));
    }

    #[test]
    fn excludes_windows_consumed_by_active_appointments() {
        let doctor = Uuid::new_v4();
        let windows = vec![
            window(doctor, DayOfWeek::Monday, "09:00", "10:00"),
            window(doctor, DayOfWeek::Monday, "14:00", "15:00"),
        ];
        let existing = vec![appointment(
            doctor,
            windows[0].id,
            monday(),
            AppointmentStatus::Pending,
        )];

        let resolved = resolve_available_slots(&windows, monday(), today(), &existing);
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].id, windows[1].id);
    }

    #[test]
    fn cancelled_appointments_free_their_window() {
        let doctor = Uuid::new_v4();
        let windows = vec![window(doctor, DayOfWeek::Monday, "09:00", "10:00")];
        let existing = vec![appointment(
            doctor,
            windows[0].id,
            monday(),
            AppointmentStatus::Cancelled,
        )];

        let resolved = resolve_available_slots(&windows, monday(), today(), &existing);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn a_booking_on_another_date_does_not_consume_this_one() {
        let doctor = Uuid::new_v4();
        let windows = vec![window(doctor, DayOfWeek::Monday, "09:00", "10:00")];
        let next_monday = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
        let existing = vec![appointment(
            doctor,
            windows[0].id,
            next_monday,
            AppointmentStatus::Confirmed,
        )];

        let resolved = resolve_available_slots(&windows, monday(), today(), &existing);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn past_dates_resolve_to_nothing() {
        let doctor = Uuid::new_v4();
        let windows = vec![window(doctor, DayOfWeek::Monday, "09:00", "10:00")];

        let past = NaiveDate::from_ymd_opt(2025, 2, 24).unwrap(); // also a Monday
        let resolved = resolve_available_slots(&windows, past, today(), &[]);
        assert!(resolved.is_empty());

        // Booking today itself is allowed.
        let windows = vec![window(doctor, DayOfWeek::from(today().weekday()), "09:00", "10:00")];
        let resolved = resolve_available_slots(&windows, today(), today(), &[]);
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn keeps_the_doctors_configured_window_order() {
        let doctor = Uuid::new_v4();
        let windows = vec![
            window(doctor, DayOfWeek::Monday, "14:00", "15:00"),
            window(doctor, DayOfWeek::Monday, "09:00", "10:00"),
        ];

        let resolved = resolve_available_slots(&windows, monday(), today(), &[]);
        let starts: Vec<_> = resolved.iter().map(|w| w.start_time).collect();
        assert_eq!(starts, vec![windows[0].start_time, windows[1].start_time]);
    }

    #[test]
    fn weekend_windows_resolve_when_one_exists() {
        // Weekend blocking is a workflow policy; the resolver itself serves
        // Saturday windows for Saturday dates.
        let doctor = Uuid::new_v4();
        let windows = vec![window(doctor, DayOfWeek::Saturday, "09:00", "10:00")];
        let saturday = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

        let resolved = resolve_available_slots(&windows, saturday, today(), &[]);
        assert_eq!(resolved.len(), 1);
    }
}
