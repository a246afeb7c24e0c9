use tracing::debug;
use uuid::Uuid;

use shared_store::Collection;

use crate::models::{Hospital, HospitalSearchFilters};

/// Hospital directory with filter parameters applied at the store boundary.
#[derive(Clone, Default)]
pub struct HospitalDirectory {
    hospitals: Collection<Hospital>,
}

impl HospitalDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, hospital: Hospital) {
        debug!("Registering hospital {}", hospital.id);
        self.hospitals.insert(hospital).await;
    }

    pub async fn get(&self, hospital_id: Uuid) -> Option<Hospital> {
        self.hospitals.find_one(|h| h.id == hospital_id).await
    }

    pub async fn exists(&self, hospital_id: Uuid) -> bool {
        self.get(hospital_id).await.is_some()
    }

    /// City and specialty filter exactly (case-insensitive); `search` matches
    /// a substring of the name.
    pub async fn list(&self, filters: &HospitalSearchFilters) -> Vec<Hospital> {
        let city = filters.city.as_deref().map(str::to_ascii_lowercase);
        let specialty = filters.specialty.as_deref().map(str::to_ascii_lowercase);
        let search = filters.search.as_deref().map(str::to_ascii_lowercase);

        self.hospitals
            .filter(|h| {
                if let Some(city) = &city {
                    if h.city.to_ascii_lowercase() != *city {
                        return false;
                    }
                }
                if let Some(specialty) = &specialty {
                    if h.specialty.to_ascii_lowercase() != *specialty {
                        return false;
                    }
                }
                if let Some(search) = &search {
                    if !h.name.to_ascii_lowercase().contains(search) {
                        return false;
                    }
                }
                true
            })
            .await
    }
}
