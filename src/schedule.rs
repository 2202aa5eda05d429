//! Schedule evaluation — pure, time-parameterized.
//!
//! Decides whether an alarm is live (inside its date/weekday window) and
//! due (live plus an exact minute match) against a caller-supplied instant,
//! and renders the human-readable schedule captions. No clock access and no
//! side effects; the poll loop feeds in the current minute.

use chrono::{Datelike, NaiveDate};

use crate::models::{Alarm, ClockTime, Medicine, MedicineKind, Weekday};

/// A reference instant: local calendar date plus minute-precision time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalInstant {
    pub date: NaiveDate,
    pub time: ClockTime,
}

impl LocalInstant {
    pub fn new(date: NaiveDate, time: ClockTime) -> Self {
        Self { date, time }
    }

    pub fn weekday(&self) -> Weekday {
        Weekday::from(self.date.weekday())
    }
}

/// Is the alarm inside its applicable window on `date`, independent of the
/// exact time match? Disabled alarms are never live.
pub fn is_live(medicine: &Medicine, alarm: &Alarm, date: NaiveDate) -> bool {
    if !alarm.enabled {
        return false;
    }
    match &medicine.kind {
        MedicineKind::OneTime => true,
        // An empty weekday filter means every day.
        MedicineKind::Regular => {
            alarm.days.is_empty() || alarm.days.contains(&Weekday::from(date.weekday()))
        }
        MedicineKind::Course {
            start_date,
            end_date,
        } => (*start_date..=*end_date).contains(&date),
    }
}

/// Due means live plus an exact minute match, not a range.
pub fn is_due_now(medicine: &Medicine, alarm: &Alarm, now: LocalInstant) -> bool {
    is_live(medicine, alarm, now.date) && alarm.time == now.time
}

/// Human-readable schedule summary for a medicine card.
///
/// Derived from the first alarm only, even when more exist — the behavior
/// the app has always shipped.
pub fn describe_schedule(medicine: &Medicine) -> String {
    match &medicine.kind {
        MedicineKind::OneTime => match medicine.alarms.first() {
            Some(alarm) => format!("One time on {}", alarm.time),
            None => "One time on schedule not set".into(),
        },
        MedicineKind::Regular => {
            let Some(alarm) = medicine.alarms.first() else {
                return "Schedule not set".into();
            };
            let days = if alarm.days.is_empty() {
                "every day".into()
            } else {
                join_days(&alarm.days)
            };
            format!("{} on {}", alarm.time, days)
        }
        MedicineKind::Course {
            start_date,
            end_date,
        } => format!("Course: {start_date} to {end_date}"),
    }
}

/// Caption for one row of the alarm list.
pub fn alarm_summary(kind: &MedicineKind, alarm: &Alarm) -> String {
    match kind {
        MedicineKind::OneTime => "One time only".into(),
        MedicineKind::Regular => {
            if alarm.days.is_empty() {
                "Every day".into()
            } else {
                join_days(&alarm.days)
            }
        }
        MedicineKind::Course { .. } => "During course".into(),
    }
}

fn join_days(days: &[Weekday]) -> String {
    days.iter()
        .map(Weekday::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
