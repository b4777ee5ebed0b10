use serde_json::Value;
use tracing::error;

use crate::{
    db::Database,
    errors::SurveyError,
    models::{CreateSurveyRequest, MAX_SURVEY_QUESTIONS},
    services::accounts::non_blank,
};

/// Questions to insert for a create-survey request
#[derive(Debug, PartialEq)]
pub struct QuestionBatch {
    pub questions: Vec<String>,
    pub category: Option<String>,
}

pub fn question_batch_from_request(request: CreateSurveyRequest) -> Result<QuestionBatch, SurveyError> {
    let category = non_blank(request.category);

    let questions = match request.questions {
        Some(Value::Array(batch)) => normalize_questions(&batch)?,
        _ => vec![non_blank(request.question).ok_or(SurveyError::QuestionRequired)?],
    };

    Ok(QuestionBatch { questions, category })
}

/// Trims a batch of questions and drops blank or non-text entries
pub fn normalize_questions(batch: &[Value]) -> Result<Vec<String>, SurveyError> {
    if batch.is_empty() {
        return Err(SurveyError::EmptyQuestions);
    }
    if batch.len() > MAX_SURVEY_QUESTIONS {
        return Err(SurveyError::TooManyQuestions { count: batch.len() });
    }

    let cleaned: Vec<String> = batch
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(str::to_string)
        .collect();

    if cleaned.is_empty() {
        return Err(SurveyError::AllQuestionsBlank);
    }

    Ok(cleaned)
}

/// Reads the submitted ids, drops repeats (keeping first occurrences) and
/// enforces 1..=10. Anything but an array counts as no selection.
pub fn normalize_question_ids(ids: Option<Value>) -> Result<Vec<i64>, SurveyError> {
    let ids = match ids {
        Some(Value::Array(ids)) => ids,
        _ => return Err(SurveyError::NoQuestionsSelected),
    };

    let mut unique = Vec::with_capacity(ids.len());
    for value in &ids {
        let id = question_id(value)?;
        if !unique.contains(&id) {
            unique.push(id);
        }
    }

    if unique.is_empty() {
        return Err(SurveyError::NoQuestionsSelected);
    }
    if unique.len() > MAX_SURVEY_QUESTIONS {
        return Err(SurveyError::TooManySelected { count: unique.len() });
    }

    Ok(unique)
}

fn question_id(value: &Value) -> Result<i64, SurveyError> {
    let id = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    id.ok_or_else(|| SurveyError::InvalidQuestionId {
        value: match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        },
    })
}

/// Validates and deploys a survey, replacing the active question set
pub async fn deploy_survey(db: &Database, ids: Option<Value>) -> Result<usize, SurveyError> {
    let ids = normalize_question_ids(ids)?;

    let missing = db.find_missing_question_ids(&ids).await.map_err(|e| {
        error!("Deploy Survey lookup error: {}", e);
        SurveyError::internal(e)
    })?;
    if !missing.is_empty() {
        return Err(SurveyError::UnknownQuestions { ids: missing });
    }

    db.deploy_survey(&ids).await.map_err(|e| {
        error!("Deploy Survey Transaction Error: {}", e);
        SurveyError::internal(e)
    })?;

    Ok(ids.len())
}
