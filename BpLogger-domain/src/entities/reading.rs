use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Domain model for one logged entry (two systolic/diastolic pairs)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reading {
    /// Identifier assigned by the store
    pub id: i64,

    /// Name of the person the entry belongs to
    pub user_name: Option<String>,

    /// Date of birth as entered
    pub dob: Option<String>,

    /// Free-text comment
    pub comment: Option<String>,

    /// When the entry was recorded (local time)
    pub timestamp: NaiveDateTime,

    /// First systolic measurement
    pub systolic1: i32,

    /// First diastolic measurement
    pub diastolic1: i32,

    /// Second systolic measurement
    pub systolic2: i32,

    /// Second diastolic measurement
    pub diastolic2: i32,
}

impl Reading {
    /// Calendar day of the reading, ignoring time of day
    pub fn day_key(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn measurements(&self) -> Measurements {
        Measurements {
            systolic1: self.systolic1,
            diastolic1: self.diastolic1,
            systolic2: self.systolic2,
            diastolic2: self.diastolic2,
        }
    }
}

/// The four measurements submitted with an entry or an edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurements {
    pub systolic1: i32,
    pub diastolic1: i32,
    pub systolic2: i32,
    pub diastolic2: i32,
}

/// Request for logging a new entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewEntryRequest {
    /// Name of the person (required)
    #[validate(length(min = 1, message = "Name is required"))]
    pub user_name: String,

    /// Date of birth (required)
    #[validate(length(min = 1, message = "DOB is required"))]
    pub dob: String,

    /// Free-text comment, may be empty
    pub comment: String,

    pub measurements: Measurements,
}
