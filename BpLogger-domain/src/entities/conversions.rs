use chrono::NaiveDateTime;

use bp_logger_data::models::entry as data;
use bp_logger_data::models::TIMESTAMP_FORMAT;
use bp_logger_data::repository::RepositoryError;

use crate::entities::reading::{Measurements, NewEntryRequest, Reading};

// Conversion functions between domain entities and data models.
// They follow the pattern convert_to_[target_layer]_[model_name].

/// Convert a stored record into a domain reading.
///
/// A stored timestamp that does not parse is reported here, so readings that
/// reach the block aggregator always carry a valid date-time.
pub fn convert_to_domain_reading(record: data::EntryRecord) -> Result<Reading, RepositoryError> {
    let timestamp = NaiveDateTime::parse_from_str(&record.timestamp, TIMESTAMP_FORMAT)
        .map_err(|_| RepositoryError::TimestampDecode {
            id: record.id,
            value: record.timestamp.clone(),
        })?;

    Ok(Reading {
        id: record.id,
        user_name: record.user_name,
        dob: record.dob,
        comment: record.comment,
        timestamp,
        systolic1: record.systolic1,
        diastolic1: record.diastolic1,
        systolic2: record.systolic2,
        diastolic2: record.diastolic2,
    })
}

/// Convert a batch of stored records, failing on the first bad timestamp
pub fn convert_to_domain_readings(records: Vec<data::EntryRecord>) -> Result<Vec<Reading>, RepositoryError> {
    records.into_iter().map(convert_to_domain_reading).collect()
}

/// Convert domain measurements to the data model
pub fn convert_to_data_measurements(measurements: Measurements) -> data::Measurements {
    data::Measurements {
        systolic1: measurements.systolic1,
        diastolic1: measurements.diastolic1,
        systolic2: measurements.systolic2,
        diastolic2: measurements.diastolic2,
    }
}

/// Convert a new entry request to an insert record stamped with `recorded_at`
pub fn convert_to_data_new_entry(request: NewEntryRequest, recorded_at: NaiveDateTime) -> data::NewEntryRecord {
    data::NewEntryRecord {
        user_name: Some(request.user_name),
        dob: Some(request.dob),
        comment: Some(request.comment),
        timestamp: format_timestamp(recorded_at),
        measurements: convert_to_data_measurements(request.measurements),
    }
}

/// Format a timestamp the way the store keeps it
pub fn format_timestamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}
