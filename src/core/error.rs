use std::collections::BTreeSet;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::shared::types::ApiErrorResponse;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("file not found, id: {0}")]
    FileNotFound(String),

    #[error("tags: {} not found on file with id: {}", format_tags(.missing), .id)]
    TagsNotFound {
        id: String,
        missing: BTreeSet<String>,
    },

    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("{0}")]
    BadRequest(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Search index error: {0}")]
    SearchIndex(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Render a tag set as `[a, b]`
pub fn format_tags(tags: &BTreeSet<String>) -> String {
    format!(
        "[{}]",
        tags.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    )
}

impl From<reqwest::Error> for AppError {
    fn from(e: reqwest::Error) -> Self {
        AppError::SearchIndex(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, message, details) = match self {
            AppError::FileNotFound(_) => (StatusCode::NOT_FOUND, message, None),
            AppError::TagsNotFound { missing, .. } => (
                StatusCode::BAD_REQUEST,
                message,
                Some(missing.into_iter().collect()),
            ),
            AppError::Validation(errors) => (StatusCode::BAD_REQUEST, message, Some(errors)),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, message, None),
            AppError::Conflict(_) => (StatusCode::CONFLICT, message, None),
            AppError::SearchIndex(msg) => {
                tracing::error!("Search index error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Search index error occurred".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ApiErrorResponse::new(message, details));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_not_found_message() {
        let err = AppError::FileNotFound("abc".to_string());
        assert_eq!(err.to_string(), "file not found, id: abc");
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_tags_not_found_message_lists_missing_tags() {
        let err = AppError::TagsNotFound {
            id: "abc".to_string(),
            missing: BTreeSet::from(["tag2".to_string(), "tag4".to_string()]),
        };
        assert_eq!(
            err.to_string(),
            "tags: [tag2, tag4] not found on file with id: abc"
        );
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_validation_joins_messages() {
        let err = AppError::Validation(vec!["first".to_string(), "second".to_string()]);
        assert_eq!(err.to_string(), "first, second");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            AppError::Conflict("x".into()).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::SearchIndex("down".into()).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::BadRequest("x".into()).into_response().status(),
            StatusCode::BAD_REQUEST
        );
    }
}
