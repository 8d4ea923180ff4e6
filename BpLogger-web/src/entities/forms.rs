use serde::Deserialize;

use bp_logger_domain::entities::Measurements;
use bp_logger_domain::session::SubmittedIdentity;

/// New entry form posted to `/`.
///
/// Measurements stay text until the identity has been resolved.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryForm {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub comment: Option<String>,
    pub sys1: Option<String>,
    pub dia1: Option<String>,
    pub sys2: Option<String>,
    pub dia2: Option<String>,
}

impl EntryForm {
    pub fn identity(&self) -> SubmittedIdentity {
        SubmittedIdentity {
            name: self.name.clone(),
            dob: self.dob.clone(),
            comment: self.comment.clone(),
        }
    }

    /// Parse the four measurement fields
    pub fn measurements(&self) -> Result<Measurements, String> {
        Ok(Measurements {
            systolic1: parse_field("sys1", &self.sys1)?,
            diastolic1: parse_field("dia1", &self.dia1)?,
            systolic2: parse_field("sys2", &self.sys2)?,
            diastolic2: parse_field("dia2", &self.dia2)?,
        })
    }
}

/// Edit form posted to `/edit/:id`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct MeasurementsForm {
    pub sys1: i32,
    pub dia1: i32,
    pub sys2: i32,
    pub dia2: i32,
}

impl From<MeasurementsForm> for Measurements {
    fn from(form: MeasurementsForm) -> Self {
        Measurements {
            systolic1: form.sys1,
            diastolic1: form.dia1,
            systolic2: form.sys2,
            diastolic2: form.dia2,
        }
    }
}

/// Download form posted to `/download`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DownloadForm {
    pub mode: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

fn parse_field(name: &str, value: &Option<String>) -> Result<i32, String> {
    let value = value.as_deref().map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(format!("Missing {}", name));
    }
    value
        .parse::<i32>()
        .map_err(|_| format!("Invalid {} '{}'", name, value))
}
