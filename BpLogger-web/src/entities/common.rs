use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standardized error response format
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PublicErrorResponse {
    /// Error message
    pub message: String,

    /// Optional error code for client-side handling
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl PublicErrorResponse {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.to_string()),
        }
    }
}
