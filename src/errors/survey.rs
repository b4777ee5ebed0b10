use axum::http::StatusCode;
use thiserror::Error;

use super::{AppError, impl_into_response};
use crate::models::MAX_SURVEY_QUESTIONS;

/// Errors related to the survey question bank and its deployment
#[derive(Error, Debug)]
pub enum SurveyError {
    #[error("Questions array is empty")]
    EmptyQuestions,

    #[error("Too many questions: {count} (max: {})", MAX_SURVEY_QUESTIONS)]
    TooManyQuestions { count: usize },

    #[error("All provided questions are empty")]
    AllQuestionsBlank,

    #[error("Question is required")]
    QuestionRequired,

    #[error("No questions selected for deployment")]
    NoQuestionsSelected,

    #[error("Too many questions selected: {count} (max: {})", MAX_SURVEY_QUESTIONS)]
    TooManySelected { count: usize },

    #[error("Invalid question id: {value}")]
    InvalidQuestionId { value: String },

    #[error("Unknown question ids: {ids:?}")]
    UnknownQuestions { ids: Vec<i64> },

    #[error("Internal server error: {message}")]
    InternalServerError { message: String },
}

impl AppError for SurveyError {
    fn status_code(&self) -> StatusCode {
        match self {
            SurveyError::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    fn user_message(&self) -> String {
        match self {
            SurveyError::EmptyQuestions => "Questions array is empty.".to_string(),
            SurveyError::TooManyQuestions { .. } => {
                format!("You can only add up to {} questions.", MAX_SURVEY_QUESTIONS)
            }
            SurveyError::AllQuestionsBlank => "All provided questions are empty.".to_string(),
            SurveyError::QuestionRequired => "Question is required".to_string(),
            SurveyError::NoQuestionsSelected => "Please select at least one question.".to_string(),
            SurveyError::TooManySelected { .. } => {
                format!("You can only select up to {} questions.", MAX_SURVEY_QUESTIONS)
            }
            SurveyError::InvalidQuestionId { value } => format!("Invalid question id: {}", value),
            SurveyError::UnknownQuestions { ids } => {
                let ids: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
                format!("Unknown question ids: {}", ids.join(", "))
            }
            SurveyError::InternalServerError { .. } => "Internal server error".to_string(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SurveyError::EmptyQuestions => "SURVEY_EMPTY_QUESTIONS",
            SurveyError::TooManyQuestions { .. } => "SURVEY_TOO_MANY_QUESTIONS",
            SurveyError::AllQuestionsBlank => "SURVEY_ALL_QUESTIONS_BLANK",
            SurveyError::QuestionRequired => "SURVEY_QUESTION_REQUIRED",
            SurveyError::NoQuestionsSelected => "SURVEY_NO_QUESTIONS_SELECTED",
            SurveyError::TooManySelected { .. } => "SURVEY_TOO_MANY_SELECTED",
            SurveyError::InvalidQuestionId { .. } => "SURVEY_INVALID_QUESTION_ID",
            SurveyError::UnknownQuestions { .. } => "SURVEY_UNKNOWN_QUESTIONS",
            SurveyError::InternalServerError { .. } => "SURVEY_INTERNAL_SERVER_ERROR",
        }
    }
}

impl_into_response!(SurveyError);

impl SurveyError {
    pub fn internal<E: std::fmt::Display>(error: E) -> Self {
        Self::InternalServerError { message: error.to_string() }
    }
}
