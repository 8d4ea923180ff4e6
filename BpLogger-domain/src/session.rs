//! Identity remembered for one visitor between form submissions.
//!
//! The web layer owns one `UserSession` per browser session and passes it
//! explicitly to the entry handlers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity fields remembered across requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSession {
    pub user_name: Option<String>,
    pub dob: Option<String>,
    pub comment: Option<String>,
}

/// Identity fields as submitted on the entry form
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmittedIdentity {
    pub name: Option<String>,
    pub dob: Option<String>,
    pub comment: Option<String>,
}

/// Identity that passed the presence checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_name: String,
    pub dob: String,
    pub comment: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("Name and DOB required")]
    Missing,
}

impl UserSession {
    /// True once both name and date of birth are remembered
    pub fn knows_identity(&self) -> bool {
        present(&self.user_name).is_some() && present(&self.dob).is_some()
    }

    /// Merge the submitted identity with what the session remembers.
    ///
    /// A non-empty session value wins over the form. The merged values are
    /// stored back into the session before the presence check, so a partial
    /// identity is remembered even when the submission is rejected.
    pub fn resolve(&mut self, submitted: SubmittedIdentity) -> Result<ResolvedIdentity, IdentityError> {
        self.user_name = pick(self.user_name.take(), submitted.name);
        self.dob = pick(self.dob.take(), submitted.dob);
        self.comment = pick(self.comment.take(), submitted.comment);

        match (present(&self.user_name), present(&self.dob)) {
            (Some(user_name), Some(dob)) => Ok(ResolvedIdentity {
                user_name: user_name.to_string(),
                dob: dob.to_string(),
                comment: self.comment.clone().unwrap_or_default(),
            }),
            _ => Err(IdentityError::Missing),
        }
    }
}

fn pick(remembered: Option<String>, submitted: Option<String>) -> Option<String> {
    match remembered {
        Some(value) if !value.is_empty() => Some(value),
        _ => submitted,
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}
