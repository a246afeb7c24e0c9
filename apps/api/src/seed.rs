//! Demo dataset for local development, enabled with SEED_DEMO_DATA=true.

use chrono::{NaiveDate, NaiveTime, Utc};
use tracing::info;
use uuid::Uuid;

use doctor_cell::models::{DayOfWeek, Doctor, TimeSlot};
use doctor_cell::services::directory::DoctorDirectory;
use hospital_cell::models::Hospital;
use hospital_cell::services::directory::HospitalDirectory;
use patient_cell::models::Patient;
use patient_cell::services::directory::PatientDirectory;

fn time(value: &str) -> NaiveTime {
    NaiveTime::parse_from_str(value, "%H:%M").expect("seed time literal")
}

pub async fn seed_demo_data(
    hospitals: &HospitalDirectory,
    doctors: &DoctorDirectory,
    patients: &PatientDirectory,
) {
    let lakeview = Hospital {
        id: Uuid::new_v4(),
        name: "Lakeview General Hospital".to_string(),
        address: "1 Lakeshore Drive".to_string(),
        city: "Pune".to_string(),
        state: "MH".to_string(),
        specialty: "cardio".to_string(),
        bed_total: 220,
        bed_available: 64,
        is_icu_available: true,
        icu_total: 20,
        icu_available: 6,
        phone: "020-555-0100".to_string(),
        email: "contact@lakeview.example".to_string(),
        image: None,
        rating: Some(4.4),
        created_at: Utc::now(),
    };
    let northside = Hospital {
        id: Uuid::new_v4(),
        name: "Northside Medical Center".to_string(),
        address: "48 Hill Road".to_string(),
        city: "Bengaluru".to_string(),
        state: "KA".to_string(),
        specialty: "neurological".to_string(),
        bed_total: 150,
        bed_available: 31,
        is_icu_available: true,
        icu_total: 10,
        icu_available: 2,
        phone: "080-555-0188".to_string(),
        email: "contact@northside.example".to_string(),
        image: None,
        rating: Some(4.1),
        created_at: Utc::now(),
    };
    hospitals.insert(lakeview.clone()).await;
    hospitals.insert(northside.clone()).await;

    let staff = [
        (lakeview.id, "Asha Verma", "Cardiology", "Heart Surgeon", 14),
        (lakeview.id, "Dev Kulkarni", "Pediatrics", "Child Specialist", 8),
        (northside.id, "Meera Iyer", "Neurology", "Brain Specialist", 19),
        (northside.id, "Arjun Rao", "Orthopedics", "Bone Specialist", 11),
    ];

    let weekday_windows = [
        (DayOfWeek::Monday, "09:00", "10:00"),
        (DayOfWeek::Monday, "10:00", "11:00"),
        (DayOfWeek::Wednesday, "14:00", "15:00"),
        (DayOfWeek::Friday, "09:00", "10:00"),
    ];

    for (hospital_id, name, department, specialty, experience) in staff {
        let doctor = Doctor {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: name.to_string(),
            hospital_id,
            department: department.to_string(),
            specialty: specialty.to_string(),
            experience_years: experience,
            phone: "555-0150".to_string(),
            created_at: Utc::now(),
        };
        for (day, start, end) in weekday_windows {
            doctors
                .insert_slot(TimeSlot {
                    id: Uuid::new_v4(),
                    doctor_id: doctor.id,
                    day_of_week: day,
                    start_time: time(start),
                    end_time: time(end),
                    created_at: Utc::now(),
                })
                .await;
        }
        doctors.insert(doctor).await;
    }

    patients
        .insert(Patient {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            full_name: "Rohan Mehta".to_string(),
            phone: "555-0199".to_string(),
            date_of_birth: NaiveDate::from_ymd_opt(1990, 4, 2).expect("seed date literal"),
            blood_group: "O+".to_string(),
            address: "12 Lake Road".to_string(),
            city: "Pune".to_string(),
            state: "MH".to_string(),
            created_at: Utc::now(),
        })
        .await;

    info!("Seeded demo hospitals, staff, and a demo patient");
}
