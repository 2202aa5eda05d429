//! Medicine and alarm entities.
//!
//! The wire layout matches the persisted JSON collection: camelCase field
//! names, alarm times as "HH:MM" strings, weekday filters as full day
//! names, and the scheduling category internally tagged as `type` with the
//! course date range flattened into the medicine object. A course without
//! both dates is unrepresentable.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::enums::{MedicineType, Weekday};
use super::ValidationError;

/// Wall-clock time of day with minute precision. Wire format "HH:MM".
///
/// The derived `Ord` sorts by (hour, minute), which coincides with the
/// lexicographic order of the zero-padded rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, ValidationError> {
        if hour > 23 || minute > 59 {
            return Err(ValidationError::InvalidTime {
                value: format!("{hour}:{minute}"),
            });
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// 12-hour rendering for display, e.g. "8:05 AM".
    pub fn format_12h(&self) -> String {
        let am_pm = if self.hour >= 12 { "PM" } else { "AM" };
        let hour12 = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{hour12}:{:02} {am_pm}", self.minute)
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl FromStr for ClockTime {
    type Err = ValidationError;

    /// Strict 24-hour "HH:MM". Malformed values are rejected, not clamped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidTime { value: s.into() };

        let (h, m) = s.split_once(':').ok_or_else(invalid)?;
        if h.len() != 2 || m.len() != 2 {
            return Err(invalid());
        }
        if !h.chars().chain(m.chars()).all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour: u8 = h.parse().map_err(|_| invalid())?;
        let minute: u8 = m.parse().map_err(|_| invalid())?;
        Self::new(hour, minute).map_err(|_| invalid())
    }
}

impl Serialize for ClockTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ClockTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One reminder rule attached to a medicine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: Uuid,
    pub time: ClockTime,
    /// Weekday filter, meaningful for regular medicines. Empty means every day.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<Weekday>,
    pub enabled: bool,
}

impl Alarm {
    /// New enabled alarm firing every day at `time`.
    pub fn new(time: ClockTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            time,
            days: Vec::new(),
            enabled: true,
        }
    }

    /// New enabled alarm restricted to the given weekdays.
    pub fn on_days(time: ClockTime, days: Vec<Weekday>) -> Self {
        Self {
            days,
            ..Self::new(time)
        }
    }
}

/// Scheduling category of a medicine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MedicineKind {
    OneTime,
    Regular,
    #[serde(rename_all = "camelCase")]
    Course {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

impl MedicineKind {
    pub fn medicine_type(&self) -> MedicineType {
        match self {
            Self::OneTime => MedicineType::OneTime,
            Self::Regular => MedicineType::Regular,
            Self::Course { .. } => MedicineType::Course,
        }
    }
}

/// One trackable medication with its reminder alarms.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medicine {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(flatten)]
    pub kind: MedicineKind,
    pub alarms: Vec<Alarm>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub dosage: String,
    #[serde(default = "default_created_at")]
    pub created_at: DateTime<Utc>,
    /// Contact address for the outbound notification capability.
    /// `None` disables automatic dispatch for this medicine entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notify_destination: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

fn default_created_at() -> DateTime<Utc> {
    DateTime::<Utc>::UNIX_EPOCH
}

impl Medicine {
    /// Create a medicine with a fresh id and creation timestamp.
    pub fn new(name: impl Into<String>, kind: MedicineKind, dosage: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: String::new(),
            kind,
            alarms: Vec::new(),
            stock: 0,
            dosage: dosage.into(),
            created_at: Utc::now(),
            notify_destination: None,
            photo_url: None,
        }
    }

    pub fn medicine_type(&self) -> MedicineType {
        self.kind.medicine_type()
    }

    pub fn is_low_stock(&self, threshold: u32) -> bool {
        self.stock <= threshold
    }

    /// Creation/update invariants. No side effects.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if let MedicineKind::Course {
            start_date,
            end_date,
        } = &self.kind
        {
            if start_date > end_date {
                return Err(ValidationError::CourseDatesInverted {
                    start: *start_date,
                    end: *end_date,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn clock_time_parses_valid_values() {
        assert_eq!(time("00:00"), ClockTime::new(0, 0).unwrap());
        assert_eq!(time("08:05"), ClockTime::new(8, 5).unwrap());
        assert_eq!(time("23:59"), ClockTime::new(23, 59).unwrap());
    }

    #[test]
    fn clock_time_rejects_malformed_values() {
        for bad in ["24:00", "12:60", "8:00", "08:5", "0800", "ab:cd", "", "08:00:00", "-1:30"] {
            assert!(bad.parse::<ClockTime>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn clock_time_displays_zero_padded() {
        assert_eq!(time("08:05").to_string(), "08:05");
        assert_eq!(time("23:59").to_string(), "23:59");
    }

    #[test]
    fn clock_time_orders_chronologically() {
        assert!(time("08:00") < time("08:01"));
        assert!(time("09:00") < time("20:00"));
        assert!(time("19:59") < time("20:00"));
    }

    #[test]
    fn clock_time_12h_rendering() {
        assert_eq!(time("00:15").format_12h(), "12:15 AM");
        assert_eq!(time("08:05").format_12h(), "8:05 AM");
        assert_eq!(time("12:00").format_12h(), "12:00 PM");
        assert_eq!(time("20:30").format_12h(), "8:30 PM");
    }

    #[test]
    fn validate_rejects_blank_name() {
        let med = Medicine::new("   ", MedicineKind::Regular, "1 pill");
        assert!(matches!(med.validate(), Err(ValidationError::EmptyName)));
    }

    #[test]
    fn validate_rejects_inverted_course_dates() {
        let med = Medicine::new(
            "Amoxicillin",
            MedicineKind::Course {
                start_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            },
            "500 mg",
        );
        assert!(matches!(
            med.validate(),
            Err(ValidationError::CourseDatesInverted { .. })
        ));
    }

    #[test]
    fn validate_accepts_single_day_course() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let med = Medicine::new(
            "Amoxicillin",
            MedicineKind::Course {
                start_date: day,
                end_date: day,
            },
            "500 mg",
        );
        assert!(med.validate().is_ok());
    }

    #[test]
    fn medicine_serializes_with_original_wire_layout() {
        let mut med = Medicine::new(
            "Aspirin",
            MedicineKind::Course {
                start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                end_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            },
            "100 mg",
        );
        med.notify_destination = Some("5511999990000".into());
        med.alarms.push(Alarm::new(time("09:00")));

        let json = serde_json::to_value(&med).unwrap();
        assert_eq!(json["type"], "course");
        assert_eq!(json["startDate"], "2024-01-01");
        assert_eq!(json["endDate"], "2024-01-10");
        assert_eq!(json["notifyDestination"], "5511999990000");
        assert_eq!(json["alarms"][0]["time"], "09:00");
        assert!(json.get("photoUrl").is_none());
        assert!(json["alarms"][0].get("days").is_none());
    }

    #[test]
    fn one_time_medicine_carries_no_date_fields() {
        let med = Medicine::new("Ibuprofen", MedicineKind::OneTime, "200 mg");
        let json = serde_json::to_value(&med).unwrap();
        assert_eq!(json["type"], "one-time");
        assert!(json.get("startDate").is_none());
        assert!(json.get("endDate").is_none());
    }

    #[test]
    fn medicine_round_trips_through_json() {
        let mut med = Medicine::new("Aspirin", MedicineKind::Regular, "100 mg");
        med.description = "Blood thinner".into();
        med.stock = 12;
        med.alarms.push(Alarm::on_days(
            time("20:00"),
            vec![Weekday::Monday, Weekday::Wednesday],
        ));

        let json = serde_json::to_string(&med).unwrap();
        let back: Medicine = serde_json::from_str(&json).unwrap();
        assert_eq!(back, med);
    }

    #[test]
    fn course_record_missing_dates_fails_decode() {
        let raw = r#"{
            "id": "5f7e8f3a-3c6c-4df2-9f3e-2d6a1c9b0a11",
            "name": "Amoxicillin",
            "type": "course",
            "alarms": []
        }"#;
        assert!(serde_json::from_str::<Medicine>(raw).is_err());
    }

    #[test]
    fn record_missing_name_fails_decode() {
        let raw = r#"{
            "id": "5f7e8f3a-3c6c-4df2-9f3e-2d6a1c9b0a11",
            "type": "regular",
            "alarms": []
        }"#;
        assert!(serde_json::from_str::<Medicine>(raw).is_err());
    }

    #[test]
    fn reader_tolerates_absent_optional_fields() {
        let raw = r#"{
            "id": "5f7e8f3a-3c6c-4df2-9f3e-2d6a1c9b0a11",
            "name": "Aspirin",
            "type": "one-time",
            "alarms": [{"id": "6a7e8f3a-3c6c-4df2-9f3e-2d6a1c9b0a12", "time": "08:00", "enabled": true}]
        }"#;
        let med: Medicine = serde_json::from_str(raw).unwrap();
        assert_eq!(med.stock, 0);
        assert!(med.notify_destination.is_none());
        assert!(med.alarms[0].days.is_empty());
    }
}
