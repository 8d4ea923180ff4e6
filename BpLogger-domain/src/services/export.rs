//! CSV export of logged readings.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use csv::{Terminator, WriterBuilder};
use thiserror::Error;
use tracing::debug;

use crate::entities::reading::Reading;

/// File name offered to the browser
pub const EXPORT_FILE_NAME: &str = "bp_log.csv";

/// Date format of the range fields on the download form
pub const RANGE_DATE_FORMAT: &str = "%Y-%m-%d";

const HEADER: [&str; 8] = ["Date/Time", "Name", "DOB", "Comment", "Sys1", "Dia1", "Sys2", "Dia2"];
const ROW_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Missing {0} for range export")]
    MissingBound(&'static str),

    #[error("Invalid {field} '{value}', expected YYYY-MM-DD")]
    InvalidDate { field: &'static str, value: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Buffer(String),
}

/// Which readings to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    All,
    /// Inclusive calendar-date range
    Range { start: NaiveDate, end: NaiveDate },
}

impl ExportScope {
    /// Interpret the download form. Only `mode == "range"` restricts the export.
    pub fn from_form(
        mode: Option<&str>,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Self, ExportError> {
        if mode != Some("range") {
            return Ok(ExportScope::All);
        }

        let start = parse_bound("start_date", start_date)?;
        let end = parse_bound("end_date", end_date)?;
        Ok(ExportScope::Range { start, end })
    }

    /// Inclusive timestamp bounds: start of the first day through 23:59 of the last
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        match self {
            ExportScope::All => None,
            ExportScope::Range { start, end } => {
                let from = start.and_time(NaiveTime::from_hms_opt(0, 0, 0)?);
                let to = end.and_time(NaiveTime::from_hms_opt(23, 59, 0)?);
                Some((from, to))
            }
        }
    }
}

fn parse_bound(field: &'static str, value: Option<&str>) -> Result<NaiveDate, ExportError> {
    let value = value
        .filter(|v| !v.is_empty())
        .ok_or(ExportError::MissingBound(field))?;
    NaiveDate::parse_from_str(value, RANGE_DATE_FORMAT).map_err(|_| ExportError::InvalidDate {
        field,
        value: value.to_string(),
    })
}

/// Render readings as CSV, oldest first, with CRLF line endings.
///
/// Readings are sorted here as well, so the caller may pass them in any order.
pub fn write_csv(readings: &[Reading]) -> Result<Vec<u8>, ExportError> {
    let mut ordered: Vec<&Reading> = readings.iter().collect();
    ordered.sort_by_key(|reading| reading.timestamp);

    let mut writer = WriterBuilder::new()
        .terminator(Terminator::CRLF)
        .from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for reading in ordered {
        writer.write_record([
            reading.timestamp.format(ROW_TIMESTAMP_FORMAT).to_string(),
            reading.user_name.clone().unwrap_or_default(),
            reading.dob.clone().unwrap_or_default(),
            reading.comment.clone().unwrap_or_default(),
            reading.systolic1.to_string(),
            reading.diastolic1.to_string(),
            reading.systolic2.to_string(),
            reading.diastolic2.to_string(),
        ])?;
    }

    debug!("Rendered {} readings as CSV", readings.len());
    writer.into_inner().map_err(|e| ExportError::Buffer(e.to_string()))
}
