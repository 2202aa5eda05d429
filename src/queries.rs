//! Derived views over the medicine collection.
//!
//! Pure functions, recomputed on demand from whatever the caller loaded;
//! there is no persisted index.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Alarm, Medicine, MedicineType};
use crate::schedule::alarm_summary;

/// Medicines of one scheduling category.
pub fn by_type(medicines: &[Medicine], kind: MedicineType) -> Vec<Medicine> {
    medicines
        .iter()
        .filter(|m| m.medicine_type() == kind)
        .cloned()
        .collect()
}

/// Medicines at or below the stock threshold.
pub fn low_stock(medicines: &[Medicine], threshold: u32) -> Vec<Medicine> {
    medicines
        .iter()
        .filter(|m| m.is_low_stock(threshold))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over name and description.
/// A blank query returns the whole collection.
pub fn search(medicines: &[Medicine], query: &str) -> Vec<Medicine> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return medicines.to_vec();
    }
    medicines
        .iter()
        .filter(|m| {
            m.name.to_lowercase().contains(&query)
                || m.description.to_lowercase().contains(&query)
        })
        .cloned()
        .collect()
}

/// One row of the alarm list view: an alarm joined with its owning
/// medicine, plus the schedule caption.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmEntry {
    pub medicine_id: Uuid,
    pub medicine_name: String,
    pub dosage: String,
    pub alarm: Alarm,
    pub schedule: String,
}

/// Every alarm across the collection, sorted ascending by time of day.
pub fn alarm_entries(medicines: &[Medicine]) -> Vec<AlarmEntry> {
    let mut entries: Vec<AlarmEntry> = medicines
        .iter()
        .flat_map(|medicine| {
            medicine.alarms.iter().map(move |alarm| AlarmEntry {
                medicine_id: medicine.id,
                medicine_name: medicine.name.clone(),
                dosage: medicine.dosage.clone(),
                schedule: alarm_summary(&medicine.kind, alarm),
                alarm: alarm.clone(),
            })
        })
        .collect();
    entries.sort_by(|a, b| a.alarm.time.cmp(&b.alarm.time));
    entries
}
