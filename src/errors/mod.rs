use axum::http::StatusCode;
use thiserror::Error;

pub mod auth;
pub mod import;
pub mod reservation;
pub mod survey;

pub use auth::AuthError;
pub use import::ImportError;
pub use reservation::ReservationError;
pub use survey::SurveyError;

/// Common trait for all custom error types in the application
pub trait AppError: std::error::Error + Send + Sync + 'static {
    /// Get the HTTP status code for this error
    fn status_code(&self) -> StatusCode;

    /// Get a user-friendly error message
    fn user_message(&self) -> String;

    /// Get the error code for frontend handling
    fn error_code(&self) -> &'static str;
}

/// Macro to implement IntoResponse for all AppError types
/// This provides consistent HTTP response formatting
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                use crate::errors::AppError;
                use axum::response::Json;
                use serde_json::json;

                let status = self.status_code();
                if status.is_server_error() {
                    tracing::error!(code = self.error_code(), "{}", self);
                } else {
                    tracing::debug!(code = self.error_code(), "{}", self);
                }

                let body = Json(json!({
                    "error": self.user_message(),
                    "code": self.error_code(),
                    "status": status.as_u16()
                }));

                (status, body).into_response()
            }
        }
    };
}

pub(crate) use impl_into_response;

/// Generic API error for failures outside any specific domain
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {message}")]
    InvalidBody { message: String },

    #[error("Internal server error: {message}")]
    InternalServerError { message: String },
}

impl AppError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidBody { .. } => StatusCode::BAD_REQUEST,
            ApiError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            ApiError::InvalidBody { message } => format!("Invalid request body: {}", message),
            ApiError::InternalServerError { .. } => "An internal error occurred".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ApiError::InvalidBody { .. } => "INVALID_REQUEST_BODY",
            ApiError::InternalServerError { .. } => "INTERNAL_SERVER_ERROR",
        }
    }
}

impl_into_response!(ApiError);

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::InvalidBody { message: rejection.body_text() }
    }
}

impl ApiError {
    pub fn internal_server_error<S: Into<String>>(message: S) -> Self {
        Self::InternalServerError { message: message.into() }
    }
}
