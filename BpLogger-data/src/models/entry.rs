use serde::{Deserialize, Serialize};

/// Storage format of the `timestamp` column. Lexicographic order of the
/// stored text matches chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Storage model for a logged entry (one row of `bp_entries`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    /// Row identifier assigned by the store
    pub id: i64,

    /// Name of the person the entry belongs to
    pub user_name: Option<String>,

    /// Date of birth as entered on the form
    pub dob: Option<String>,

    /// Free-text comment
    pub comment: Option<String>,

    /// When the entry was recorded, in `TIMESTAMP_FORMAT`
    pub timestamp: String,

    /// First systolic measurement
    pub systolic1: i32,

    /// First diastolic measurement
    pub diastolic1: i32,

    /// Second systolic measurement
    pub systolic2: i32,

    /// Second diastolic measurement
    pub diastolic2: i32,
}

/// Input data for inserting a new entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEntryRecord {
    pub user_name: Option<String>,
    pub dob: Option<String>,
    pub comment: Option<String>,
    /// When the entry was recorded, in `TIMESTAMP_FORMAT`
    pub timestamp: String,
    pub measurements: Measurements,
}

/// The four measurements of an entry (two systolic/diastolic pairs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurements {
    pub systolic1: i32,
    pub diastolic1: i32,
    pub systolic2: i32,
    pub diastolic2: i32,
}

impl EntryRecord {
    /// Build a stored record from an insert request and the id the store assigned
    pub fn from_new(id: i64, new: NewEntryRecord) -> Self {
        Self {
            id,
            user_name: new.user_name,
            dob: new.dob,
            comment: new.comment,
            timestamp: new.timestamp,
            systolic1: new.measurements.systolic1,
            diastolic1: new.measurements.diastolic1,
            systolic2: new.measurements.systolic2,
            diastolic2: new.measurements.diastolic2,
        }
    }

    /// Replace the four measurements in place
    pub fn apply(&mut self, measurements: Measurements) {
        self.systolic1 = measurements.systolic1;
        self.diastolic1 = measurements.diastolic1;
        self.systolic2 = measurements.systolic2;
        self.diastolic2 = measurements.diastolic2;
    }

    /// Current measurements of this record
    pub fn measurements(&self) -> Measurements {
        Measurements {
            systolic1: self.systolic1,
            diastolic1: self.diastolic1,
            systolic2: self.systolic2,
            diastolic2: self.diastolic2,
        }
    }
}
