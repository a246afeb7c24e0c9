use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Datelike, Duration, NaiveDate, Utc, Weekday};
use uuid::Uuid;

use booking_cell::models::{
    Appointment, AppointmentStatus, BookingError, BookingPolicy, SubmitAppointmentRequest,
};
use booking_cell::services::booking::BookingService;
use booking_cell::services::lifecycle::AppointmentLifecycleService;
use booking_cell::state::BookingCellState;
use doctor_cell::models::{CreateTimeSlotRequest, Doctor};
use doctor_cell::services::availability::AvailabilityService;
use doctor_cell::services::directory::DoctorDirectory;
use hospital_cell::models::Hospital;
use hospital_cell::services::directory::HospitalDirectory;
use patient_cell::models::Patient;
use patient_cell::services::directory::PatientDirectory;

struct Fixture {
    state: BookingCellState,
    hospital_id: Uuid,
    doctor_id: Uuid,
    patient_id: Uuid,
    monday_slot_id: Uuid,
}

/// The next date with the given weekday, at least one week out so "not in the
/// past" never interferes.
fn upcoming(weekday: Weekday) -> NaiveDate {
    let mut date = Utc::now().date_naive() + Duration::days(7);
    while date.weekday() != weekday {
        date += Duration::days(1);
    }
    date
}

fn doctor(hospital_id: Uuid, department: &str) -> Doctor {
    Doctor {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        full_name: "Asha Verma".to_string(),
        hospital_id,
        department: department.to_string(),
        specialty: "Interventional Cardiology".to_string(),
        experience_years: 12,
        phone: "555-0101".to_string(),
        created_at: Utc::now(),
    }
}

fn patient() -> Patient {
    Patient {
        id: Uuid::new_v4(),
        user_id: Uuid::new_v4(),
        full_name: "Rohan Mehta".to_string(),
        phone: "555-0199".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
        blood_group: "O+".to_string(),
        address: "12 Lake Road".to_string(),
        city: "Pune".to_string(),
        state: "MH".to_string(),
        created_at: Utc::now(),
    }
}

fn hospital() -> Hospital {
    Hospital {
        id: Uuid::new_v4(),
        name: "Lakeview Hospital".to_string(),
        address: "1 Main St".to_string(),
        city: "Pune".to_string(),
        state: "MH".to_string(),
        specialty: "cardio".to_string(),
        bed_total: 120,
        bed_available: 40,
        is_icu_available: true,
        icu_total: 12,
        icu_available: 3,
        phone: "555-0100".to_string(),
        email: "info@lakeview.example".to_string(),
        image: None,
        rating: Some(4.2),
        created_at: Utc::now(),
    }
}

/// One hospital, one cardiology doctor with a Monday 09:00-10:00 window, one
/// registered patient.
async fn fixture() -> Fixture {
    let doctors = Arc::new(DoctorDirectory::new());
    let patients = Arc::new(PatientDirectory::new());
    let hospitals = Arc::new(HospitalDirectory::new());

    let h = hospital();
    let hospital_id = h.id;
    hospitals.insert(h).await;

    let d = doctor(hospital_id, "Cardiology");
    let doctor_id = d.id;
    doctors.insert(d).await;

    let availability = AvailabilityService::new((*doctors).clone());
    let slot = availability
        .create_window(
            doctor_id,
            CreateTimeSlotRequest {
                day_of_week: "Monday".to_string(),
                start_time: "09:00".to_string(),
                end_time: "10:00".to_string(),
            },
        )
        .await
        .unwrap();

    let p = patient();
    let patient_id = p.id;
    patients.insert(p).await;

    let state = BookingCellState::new(doctors, patients, hospitals, BookingPolicy::default());

    Fixture {
        state,
        hospital_id,
        doctor_id,
        patient_id,
        monday_slot_id: slot.id,
    }
}

fn request(f: &Fixture, date: NaiveDate) -> SubmitAppointmentRequest {
    SubmitAppointmentRequest {
        patient_id: f.patient_id,
        hospital_id: f.hospital_id,
        department: "Cardiology".to_string(),
        doctor_id: f.doctor_id,
        appointment_date: date,
        time_slot_id: f.monday_slot_id,
        reason: "persistent chest pain".to_string(),
        diagnosis: None,
    }
}

// Scenario A: resolve -> book -> the slot is consumed for the next resolver.
#[tokio::test]
async fn booking_consumes_the_resolved_slot() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);
    let monday = upcoming(Weekday::Mon);

    let resolved = service.resolve_slots(f.doctor_id, monday).await.unwrap();
    assert_eq!(resolved.len(), 1);
    assert_eq!(resolved[0].id, f.monday_slot_id);

    let appointment = service.submit_appointment(request(&f, monday)).await.unwrap();
    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert_eq!(appointment.appointment_date, monday);
    assert_eq!(appointment.time_slot_id, f.monday_slot_id);

    // A second patient resolving the same Monday sees nothing.
    let resolved = service.resolve_slots(f.doctor_id, monday).await.unwrap();
    assert!(resolved.is_empty());

    // The following Monday is untouched.
    let next_monday = monday + Duration::days(7);
    let resolved = service.resolve_slots(f.doctor_id, next_monday).await.unwrap();
    assert_eq!(resolved.len(), 1);
}

// Scenario B: past dates resolve to nothing and cannot be booked.
#[tokio::test]
async fn past_dates_are_rejected() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);

    let mut past = Utc::now().date_naive() - Duration::days(7);
    while past.weekday() != Weekday::Mon {
        past -= Duration::days(1);
    }

    let resolved = service.resolve_slots(f.doctor_id, past).await.unwrap();
    assert!(resolved.is_empty());

    let result = service.submit_appointment(request(&f, past)).await;
    assert_matches!(result, Err(BookingError::Validation(_)));
}

// Scenario C: two concurrent submissions, exactly one wins.
#[tokio::test]
async fn concurrent_submissions_admit_exactly_one() {
    let f = fixture().await;
    let monday = upcoming(Weekday::Mon);

    // A second patient racing for the same slot triple.
    let rival = patient();
    let rival_id = rival.id;
    f.state.patients.insert(rival).await;

    let mut requests = vec![request(&f, monday)];
    let mut second = request(&f, monday);
    second.patient_id = rival_id;
    requests.push(second);

    let mut handles = Vec::new();
    for req in requests {
        let state = f.state.clone();
        handles.push(tokio::spawn(async move {
            BookingService::new(&state).submit_appointment(req).await
        }));
    }

    let mut successes = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(appointment) => {
                assert_eq!(appointment.status, AppointmentStatus::Pending);
                successes += 1;
            }
            Err(BookingError::SlotUnavailable) => conflicts += 1,
            Err(other) => panic!("unexpected booking error: {other:?}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(conflicts, 1);

    // The uniqueness invariant holds in the store itself.
    let active = f
        .state
        .appointments
        .filter(|a| {
            a.doctor_id == f.doctor_id
                && a.appointment_date == monday
                && a.time_slot_id == f.monday_slot_id
                && a.status.occupies_slot()
        })
        .await;
    assert_eq!(active.len(), 1);
}

// Scenario D: a completed appointment cannot be cancelled.
#[tokio::test]
async fn completed_appointments_cannot_be_cancelled() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);
    let lifecycle = AppointmentLifecycleService::new(&f.state);
    let monday = upcoming(Weekday::Mon);

    let appointment = service.submit_appointment(request(&f, monday)).await.unwrap();
    lifecycle
        .advance(appointment.id, AppointmentStatus::Confirmed)
        .await
        .unwrap();
    lifecycle
        .advance(appointment.id, AppointmentStatus::Completed)
        .await
        .unwrap();

    let result = lifecycle.cancel(appointment.id).await;
    assert_matches!(
        result,
        Err(BookingError::InvalidTransition(AppointmentStatus::Completed))
    );

    let unchanged = lifecycle.get(appointment.id).await.unwrap();
    assert_eq!(unchanged.status, AppointmentStatus::Completed);
}

// Scenario E: patient listing is ascending by appointment date.
#[tokio::test]
async fn patient_listing_is_chronological() {
    let f = fixture().await;
    let lifecycle = AppointmentLifecycleService::new(&f.state);

    let dates = [
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
        NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
    ];
    for date in dates {
        f.state
            .appointments
            .insert(Appointment {
                id: Uuid::new_v4(),
                patient_id: f.patient_id,
                doctor_id: f.doctor_id,
                hospital_id: f.hospital_id,
                appointment_date: date,
                time_slot_id: f.monday_slot_id,
                status: AppointmentStatus::Pending,
                reason: "checkup".to_string(),
                diagnosis: None,
                prescription: None,
                review: None,
                rating: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
            .await;
    }

    let listed = lifecycle.list_by_patient(f.patient_id).await;
    let listed_dates: Vec<NaiveDate> = listed.iter().map(|a| a.appointment_date).collect();
    assert_eq!(
        listed_dates,
        vec![
            NaiveDate::from_ymd_opt(2025, 1, 5).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        ]
    );
}

#[tokio::test]
async fn cancellation_frees_the_slot_for_resolution() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);
    let lifecycle = AppointmentLifecycleService::new(&f.state);
    let monday = upcoming(Weekday::Mon);

    let appointment = service.submit_appointment(request(&f, monday)).await.unwrap();
    assert!(service.resolve_slots(f.doctor_id, monday).await.unwrap().is_empty());

    lifecycle.cancel(appointment.id).await.unwrap();

    let resolved = service.resolve_slots(f.doctor_id, monday).await.unwrap();
    assert_eq!(resolved.len(), 1);

    // And the freed slot is bookable again.
    let again = service.submit_appointment(request(&f, monday)).await.unwrap();
    assert_eq!(again.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn cancelling_twice_is_an_error_not_a_silent_success() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);
    let lifecycle = AppointmentLifecycleService::new(&f.state);
    let monday = upcoming(Weekday::Mon);

    let appointment = service.submit_appointment(request(&f, monday)).await.unwrap();
    lifecycle.cancel(appointment.id).await.unwrap();

    let result = lifecycle.cancel(appointment.id).await;
    assert_matches!(
        result,
        Err(BookingError::InvalidTransition(AppointmentStatus::Cancelled))
    );
}

#[tokio::test]
async fn advance_rejects_skipped_and_backward_steps() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);
    let lifecycle = AppointmentLifecycleService::new(&f.state);
    let monday = upcoming(Weekday::Mon);

    let appointment = service.submit_appointment(request(&f, monday)).await.unwrap();

    // pending -> completed skips confirmation.
    let skipped = lifecycle
        .advance(appointment.id, AppointmentStatus::Completed)
        .await;
    assert_matches!(skipped, Err(BookingError::InvalidTransition(AppointmentStatus::Pending)));

    // Cancellation is not an advance.
    let sideways = lifecycle
        .advance(appointment.id, AppointmentStatus::Cancelled)
        .await;
    assert_matches!(sideways, Err(BookingError::InvalidTransition(AppointmentStatus::Pending)));

    lifecycle
        .advance(appointment.id, AppointmentStatus::Confirmed)
        .await
        .unwrap();
    let backward = lifecycle
        .advance(appointment.id, AppointmentStatus::Confirmed)
        .await;
    assert_matches!(
        backward,
        Err(BookingError::InvalidTransition(AppointmentStatus::Confirmed))
    );
}

#[tokio::test]
async fn booking_validates_its_references() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);
    let monday = upcoming(Weekday::Mon);

    let mut unknown_patient = request(&f, monday);
    unknown_patient.patient_id = Uuid::new_v4();
    assert_matches!(
        service.submit_appointment(unknown_patient).await,
        Err(BookingError::PatientNotFound)
    );

    let mut unknown_doctor = request(&f, monday);
    unknown_doctor.doctor_id = Uuid::new_v4();
    assert_matches!(
        service.submit_appointment(unknown_doctor).await,
        Err(BookingError::DoctorNotFound)
    );

    let mut unknown_slot = request(&f, monday);
    unknown_slot.time_slot_id = Uuid::new_v4();
    assert_matches!(
        service.submit_appointment(unknown_slot).await,
        Err(BookingError::SlotNotFound)
    );

    let mut wrong_department = request(&f, monday);
    wrong_department.department = "Dermatology".to_string();
    assert_matches!(
        service.submit_appointment(wrong_department).await,
        Err(BookingError::Validation(_))
    );

    let mut blank_reason = request(&f, monday);
    blank_reason.reason = "  ".to_string();
    assert_matches!(
        service.submit_appointment(blank_reason).await,
        Err(BookingError::Validation(_))
    );
}

#[tokio::test]
async fn date_must_fall_on_the_windows_weekday() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);

    // Tuesday date against a Monday window.
    let tuesday = upcoming(Weekday::Tue);
    let result = service.submit_appointment(request(&f, tuesday)).await;
    assert_matches!(result, Err(BookingError::Validation(_)));
}

#[tokio::test]
async fn weekend_dates_are_policy_blocked_at_the_workflow() {
    let f = fixture().await;

    // Give the doctor a Saturday window; the resolver serves it, the default
    // policy still refuses the date at the workflow boundary.
    let availability = AvailabilityService::new((*f.state.doctors).clone());
    let saturday_slot = availability
        .create_window(
            f.doctor_id,
            CreateTimeSlotRequest {
                day_of_week: "Saturday".to_string(),
                start_time: "09:00".to_string(),
                end_time: "11:00".to_string(),
            },
        )
        .await
        .unwrap();

    let service = BookingService::new(&f.state);
    let saturday = upcoming(Weekday::Sat);

    let resolved = service.resolve_slots(f.doctor_id, saturday).await.unwrap();
    assert_eq!(resolved.len(), 1);

    let mut req = request(&f, saturday);
    req.time_slot_id = saturday_slot.id;
    assert_matches!(
        service.submit_appointment(req).await,
        Err(BookingError::Validation(_))
    );

    // A permissive policy lets the same submission through.
    let mut permissive = f.state.clone();
    permissive.policy = BookingPolicy {
        weekend_booking_allowed: true,
    };
    let service = BookingService::new(&permissive);
    let mut req = request(&f, saturday);
    req.time_slot_id = saturday_slot.id;
    assert!(service.submit_appointment(req).await.is_ok());
}

#[tokio::test]
async fn windows_with_active_appointments_cannot_be_deleted() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);
    let lifecycle = AppointmentLifecycleService::new(&f.state);
    let monday = upcoming(Weekday::Mon);

    let appointment = service.submit_appointment(request(&f, monday)).await.unwrap();

    assert_matches!(
        service.delete_time_slot(f.monday_slot_id).await,
        Err(BookingError::Validation(_))
    );

    // Once the appointment is cancelled the window can go.
    lifecycle.cancel(appointment.id).await.unwrap();
    let removed = service.delete_time_slot(f.monday_slot_id).await.unwrap();
    assert_eq!(removed.id, f.monday_slot_id);
}

#[tokio::test]
async fn consultation_record_is_written_without_touching_status() {
    let f = fixture().await;
    let service = BookingService::new(&f.state);
    let lifecycle = AppointmentLifecycleService::new(&f.state);
    let monday = upcoming(Weekday::Mon);

    let appointment = service.submit_appointment(request(&f, monday)).await.unwrap();

    let updated = lifecycle
        .update_consultation(
            appointment.id,
            booking_cell::models::UpdateConsultationRequest {
                diagnosis: Some("angina".to_string()),
                prescription: Some("nitroglycerin".to_string()),
                review: None,
                rating: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.status, AppointmentStatus::Pending);
    assert_eq!(updated.diagnosis.as_deref(), Some("angina"));

    let bad_rating = lifecycle
        .update_consultation(
            appointment.id,
            booking_cell::models::UpdateConsultationRequest {
                diagnosis: None,
                prescription: None,
                review: None,
                rating: Some(9),
            },
        )
        .await;
    assert_matches!(bad_rating, Err(BookingError::Validation(_)));
}

#[tokio::test]
async fn status_alias_scheduled_parses_as_pending() {
    let status: AppointmentStatus = serde_json::from_str("\"scheduled\"").unwrap();
    assert_eq!(status, AppointmentStatus::Pending);

    let canonical: AppointmentStatus = serde_json::from_str("\"pending\"").unwrap();
    assert_eq!(canonical, AppointmentStatus::Pending);
    assert_eq!(serde_json::to_string(&canonical).unwrap(), "\"pending\"");
}
