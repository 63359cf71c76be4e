//! Unified error handling with Sentry integration.
//!
//! Provides an `AppError` type for the HTTP surface that captures server
//! errors to Sentry before responding. Turn-level backend failures never
//! reach here; the intent router turns them into speech.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::magento::MagentoError;

/// Application-level error type for the skill service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Magento API operation failed.
    #[error("Magento error: {0}")]
    Magento(#[from] MagentoError),

    /// Bad request from the dialogue platform.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(self, Self::Magento(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Magento(_) => StatusCode::BAD_GATEWAY,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Magento(_) => "External service error".to_string(),
            Self::BadRequest(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::BadRequest("intent name is required".to_string());
        assert_eq!(err.to_string(), "Bad request: intent name is required");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Magento(MagentoError::Transport("down".to_string()))),
            StatusCode::BAD_GATEWAY
        );
    }
}
