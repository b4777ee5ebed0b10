use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::{error, info};

use crate::{
    auth::AdminUser,
    errors::{ApiError, ImportError, SurveyError},
    extract::JsonBody,
    models::{
        ActiveSurveyQuestion, CreateSurveyRequest, CreateSurveyResponse, DepartmentCount,
        DeploySurveyRequest, ImportResponse, MessageResponse, SurveyQuestion,
    },
    services::{
        csv_import::{import_students, read_csv_upload},
        surveys::{self, question_batch_from_request},
    },
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/working-summary", get(working_summary))
        .route("/department-summary", get(department_summary))
        .route("/upload-csv", post(upload_csv))
        .route("/create-survey", post(create_survey))
        .route("/surveys", get(list_surveys))
        .route("/deploy-survey", post(deploy_survey))
        .route("/active-survey", get(active_survey))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/working-summary",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Working alumni per department", body = Vec<DepartmentCount>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn working_summary(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DepartmentCount>>, ApiError> {
    let counts = state
        .db
        .count_working_alumni_by_department()
        .await
        .map_err(|e| {
            error!("Error fetching working summary: {}", e);
            ApiError::internal_server_error(e.to_string())
        })?;

    Ok(Json(counts))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/department-summary",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Alumni records per department", body = Vec<DepartmentCount>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn department_summary(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DepartmentCount>>, ApiError> {
    let counts = state.db.count_alumni_by_department().await.map_err(|e| {
        error!("Error fetching department summary: {}", e);
        ApiError::internal_server_error(e.to_string())
    })?;

    Ok(Json(counts))
}

#[utoipa::path(
    post,
    path = "/api/dashboard/upload-csv",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    request_body(content = String, description = "Multipart form with a `csv` file field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Rows imported", body = ImportResponse),
        (status = 400, description = "No file, or the file has no usable header"),
        (status = 413, description = "File exceeds the configured size limit"),
        (status = 500, description = "Failed to insert CSV data")
    )
)]
pub async fn upload_csv(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ImportError> {
    let data = read_csv_upload(&mut multipart, "csv", state.config.max_csv_size_bytes()).await?;
    let response = import_students(&state.db, &state.events, &data).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/dashboard/create-survey",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateSurveyRequest,
    responses(
        (status = 201, description = "Questions added to the bank", body = CreateSurveyResponse),
        (status = 400, description = "Empty, blank or oversized question batch")
    )
)]
pub async fn create_survey(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateSurveyRequest>,
) -> Result<(StatusCode, Json<CreateSurveyResponse>), SurveyError> {
    let batch = question_batch_from_request(request)?;

    let inserted = state
        .db
        .insert_survey_questions(&batch.questions, batch.category.as_deref())
        .await
        .map_err(|e| {
            error!("Error creating survey: {}", e);
            SurveyError::internal(e)
        })?;

    info!("Added {} survey question(s)", inserted);

    let message = if batch.questions.len() == 1 {
        "Survey question created successfully".to_string()
    } else {
        format!("{} survey questions created successfully", batch.questions.len())
    };

    Ok((
        StatusCode::CREATED,
        Json(CreateSurveyResponse {
            message,
            count: batch.questions.len(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/surveys",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Question bank, oldest first", body = Vec<SurveyQuestion>)
    )
)]
pub async fn list_surveys(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SurveyQuestion>>, SurveyError> {
    let questions = state.db.get_survey_questions().await.map_err(|e| {
        error!("Error fetching surveys: {}", e);
        SurveyError::internal(e)
    })?;

    Ok(Json(questions))
}

#[utoipa::path(
    post,
    path = "/api/dashboard/deploy-survey",
    tag = "dashboard",
    security(
        ("bearer_auth" = [])
    ),
    request_body = DeploySurveyRequest,
    responses(
        (status = 200, description = "Survey deployed", body = MessageResponse),
        (status = 400, description = "No ids, more than ten, or unknown ids")
    )
)]
pub async fn deploy_survey(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<DeploySurveyRequest>,
) -> Result<Json<MessageResponse>, SurveyError> {
    let deployed = surveys::deploy_survey(&state.db, request.question_ids).await?;
    info!("Deployed survey with {} question(s)", deployed);
    Ok(Json(MessageResponse::new("Survey deployed successfully!")))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/active-survey",
    tag = "dashboard",
    responses(
        (status = 200, description = "Deployed questions in deployment order", body = Vec<ActiveSurveyQuestion>)
    )
)]
pub async fn active_survey(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActiveSurveyQuestion>>, SurveyError> {
    let questions = state.db.get_active_survey().await.map_err(|e| {
        error!("Fetch Active Survey Error: {}", e);
        SurveyError::internal(e)
    })?;

    Ok(Json(questions))
}
