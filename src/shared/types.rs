use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned by mutating endpoints that have nothing else to report
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// Error envelope shared by every failing endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Human readable description of the failure
    pub error: String,
    /// Individual items behind the failure (field errors, missing tags)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl ApiErrorResponse {
    pub fn new(error: String, details: Option<Vec<String>>) -> Self {
        Self {
            success: false,
            error,
            details,
        }
    }
}
