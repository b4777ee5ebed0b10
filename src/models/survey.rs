use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Upper bound for a batch of new questions and for the deployed survey
pub const MAX_SURVEY_QUESTIONS: usize = 10;

/// Answer columns `q1..q10` in the `surveys` table
pub const SURVEY_ANSWER_SLOTS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SurveyQuestion {
    pub id: i64,
    pub question: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
pub struct ActiveSurveyQuestion {
    pub id: i64,
    pub question: String,
}

/// Body of `POST /api/dashboard/create-survey`. Either `question` or a
/// `questions` batch is given; the batch wins when both are present. A
/// `questions` value that is not an array is ignored.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateSurveyRequest {
    pub question: Option<String>,
    pub category: Option<String>,
    #[schema(value_type = Option<Vec<String>>)]
    pub questions: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSurveyResponse {
    pub message: String,
    pub count: usize,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DeploySurveyRequest {
    /// Integers, or strings holding integers
    #[serde(rename = "questionIds")]
    #[schema(value_type = Option<Vec<i64>>)]
    pub question_ids: Option<Value>,
}

/// Answers submitted with a reservation, keyed `q1` through `q10`
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(transparent)]
pub struct SurveyAnswers(pub BTreeMap<String, Value>);

impl SurveyAnswers {
    /// Flattens the answers into the fixed `q1..q10` columns. Missing or
    /// null answers become empty strings; numbers and booleans keep their
    /// JSON text.
    pub fn to_columns(&self) -> [String; SURVEY_ANSWER_SLOTS] {
        std::array::from_fn(|slot| {
            match self.0.get(&format!("q{}", slot + 1)) {
                Some(Value::String(text)) => text.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            }
        })
    }
}
