use axum::http::StatusCode;
use thiserror::Error;

use super::{AppError, impl_into_response};

/// Errors related to document reservations and their approval
#[derive(Error, Debug)]
pub enum ReservationError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Unknown document type '{document_type}'")]
    UnknownDocumentType { document_type: String },

    #[error("Invalid reserved_date '{value}', expected YYYY-MM-DD")]
    InvalidDate { value: String },

    #[error("Invalid reserved_time '{value}', expected HH:MM or HH:MM:SS")]
    InvalidTime { value: String },

    #[error("Student {id_number} not found")]
    StudentNotFound { id_number: i64 },

    #[error("Reservation {id} not found")]
    NotFound { id: i64 },

    #[error("Internal server error: {message}")]
    InternalServerError { message: String },
}

impl AppError for ReservationError {
    fn status_code(&self) -> StatusCode {
        match self {
            ReservationError::MissingFields
            | ReservationError::UnknownDocumentType { .. }
            | ReservationError::InvalidDate { .. }
            | ReservationError::InvalidTime { .. } => StatusCode::BAD_REQUEST,
            ReservationError::StudentNotFound { .. } | ReservationError::NotFound { .. } => {
                StatusCode::NOT_FOUND
            }
            ReservationError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            ReservationError::MissingFields => "Missing required fields".to_string(),
            ReservationError::UnknownDocumentType { document_type } => {
                format!("Unknown document type: {}", document_type)
            }
            ReservationError::InvalidDate { .. } => {
                "Invalid reserved date, expected YYYY-MM-DD".to_string()
            }
            ReservationError::InvalidTime { .. } => {
                "Invalid reserved time, expected HH:MM".to_string()
            }
            ReservationError::StudentNotFound { .. } => "Student not found".to_string(),
            ReservationError::NotFound { .. } => "Request not found".to_string(),
            ReservationError::InternalServerError { .. } => "DB error".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ReservationError::MissingFields => "RESERVATION_MISSING_FIELDS",
            ReservationError::UnknownDocumentType { .. } => "RESERVATION_UNKNOWN_DOCUMENT_TYPE",
            ReservationError::InvalidDate { .. } => "RESERVATION_INVALID_DATE",
            ReservationError::InvalidTime { .. } => "RESERVATION_INVALID_TIME",
            ReservationError::StudentNotFound { .. } => "RESERVATION_STUDENT_NOT_FOUND",
            ReservationError::NotFound { .. } => "RESERVATION_NOT_FOUND",
            ReservationError::InternalServerError { .. } => "RESERVATION_INTERNAL_SERVER_ERROR",
        }
    }
}

impl_into_response!(ReservationError);

impl ReservationError {
    pub fn internal<E: std::fmt::Display>(error: E) -> Self {
        Self::InternalServerError { message: error.to_string() }
    }
}
