pub mod enums;
pub mod medicine;

pub use enums::*;
pub use medicine::*;

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Medicine name must not be empty")]
    EmptyName,

    #[error("Invalid time of day '{value}', expected 24-hour HH:MM")]
    InvalidTime { value: String },

    #[error("Course start date {start} is after end date {end}")]
    CourseDatesInverted { start: NaiveDate, end: NaiveDate },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },
}
