use axum::http::StatusCode;
use thiserror::Error;

use super::{AppError, impl_into_response};

/// Errors raised while signing up, logging in or checking a bearer token
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Missing required fields: {message}")]
    MissingFields { message: String },

    #[error("Access denied. No token provided.")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Role '{role}' may not access this resource")]
    Forbidden { role: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email '{email}' already exists")]
    DuplicateEmail { email: String },

    #[error("Admin signup is disabled")]
    SignupDisabled,

    #[error("No student record matches the submitted details")]
    VerificationFailed,

    #[error("Student {id_number} already has an account")]
    AccountExists { id_number: i64 },

    #[error("Invalid {field}: '{value}'")]
    InvalidField { field: &'static str, value: String },

    #[error("Internal server error: {message}")]
    InternalServerError { message: String },
}

impl AppError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingFields { .. } => StatusCode::BAD_REQUEST,
            AuthError::MissingToken | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden { .. } | AuthError::SignupDisabled => StatusCode::FORBIDDEN,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::DuplicateEmail { .. } => StatusCode::CONFLICT,
            AuthError::VerificationFailed | AuthError::AccountExists { .. } => StatusCode::BAD_REQUEST,
            AuthError::InvalidField { .. } => StatusCode::BAD_REQUEST,
            AuthError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            AuthError::MissingFields { message } => message.clone(),
            AuthError::MissingToken => "Access denied. No token provided.".to_string(),
            AuthError::InvalidToken => "Invalid token".to_string(),
            AuthError::Forbidden { .. } => "Forbidden".to_string(),
            AuthError::InvalidCredentials => "Invalid credentials.".to_string(),
            AuthError::DuplicateEmail { .. } => "Email already exists".to_string(),
            AuthError::SignupDisabled => "Admin signup is disabled".to_string(),
            AuthError::VerificationFailed => "Verification failed: Student not found.".to_string(),
            AuthError::AccountExists { .. } => "Account already exists.".to_string(),
            AuthError::InvalidField { field, .. } => format!("Invalid {}", field),
            AuthError::InternalServerError { .. } => "An internal error occurred".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingFields { .. } => "AUTH_MISSING_FIELDS",
            AuthError::MissingToken => "AUTH_MISSING_TOKEN",
            AuthError::InvalidToken => "AUTH_INVALID_TOKEN",
            AuthError::Forbidden { .. } => "AUTH_FORBIDDEN",
            AuthError::InvalidCredentials => "AUTH_INVALID_CREDENTIALS",
            AuthError::DuplicateEmail { .. } => "AUTH_DUPLICATE_EMAIL",
            AuthError::SignupDisabled => "AUTH_SIGNUP_DISABLED",
            AuthError::VerificationFailed => "AUTH_VERIFICATION_FAILED",
            AuthError::AccountExists { .. } => "AUTH_ACCOUNT_EXISTS",
            AuthError::InvalidField { .. } => "AUTH_INVALID_FIELD",
            AuthError::InternalServerError { .. } => "AUTH_INTERNAL_SERVER_ERROR",
        }
    }
}

impl_into_response!(AuthError);

impl AuthError {
    pub fn missing_fields<S: Into<String>>(message: S) -> Self {
        Self::MissingFields { message: message.into() }
    }

    pub fn internal<E: std::fmt::Display>(error: E) -> Self {
        Self::InternalServerError { message: error.to_string() }
    }
}
