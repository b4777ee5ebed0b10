use axum::http::StatusCode;
use thiserror::Error;

use super::{AppError, impl_into_response};

/// Errors that abort a CSV import as a whole. Individual bad rows are
/// reported in the import summary instead.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("No file uploaded")]
    NoFile,

    #[error("Failed to read multipart body: {message}")]
    Multipart { message: String },

    #[error("CSV file exceeds the {limit} byte limit")]
    TooLarge { limit: usize },

    #[error("CSV file has no header row")]
    MissingHeader,

    #[error("Failed to insert CSV data: {message}")]
    InsertFailed { message: String },
}

impl AppError for ImportError {
    fn status_code(&self) -> StatusCode {
        match self {
            ImportError::NoFile
            | ImportError::Multipart { .. }
            | ImportError::MissingHeader => StatusCode::BAD_REQUEST,
            ImportError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ImportError::InsertFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn user_message(&self) -> String {
        match self {
            ImportError::NoFile => "No file uploaded!".to_string(),
            ImportError::Multipart { .. } => "Failed to process CSV file".to_string(),
            ImportError::TooLarge { limit } => {
                format!("CSV file exceeds the {} MB limit", limit / (1024 * 1024))
            }
            ImportError::MissingHeader => "CSV file has no header row".to_string(),
            ImportError::InsertFailed { .. } => "Failed to insert CSV data".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            ImportError::NoFile => "IMPORT_NO_FILE",
            ImportError::Multipart { .. } => "IMPORT_MULTIPART",
            ImportError::TooLarge { .. } => "IMPORT_TOO_LARGE",
            ImportError::MissingHeader => "IMPORT_MISSING_HEADER",
            ImportError::InsertFailed { .. } => "IMPORT_INSERT_FAILED",
        }
    }
}

impl_into_response!(ImportError);
