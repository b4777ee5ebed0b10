//! Survey endpoints under `/admin`, sharing their handlers with the
//! dashboard router.

use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::{
    auth::AdminUser,
    errors::SurveyError,
    extract::JsonBody,
    models::{ActiveSurveyQuestion, DeploySurveyRequest, MessageResponse},
    routes::dashboard,
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/deploy-survey", post(deploy_survey))
        .route("/active-survey", get(active_survey))
}

#[utoipa::path(
    post,
    path = "/admin/deploy-survey",
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
    admin: AdminUser,
    state: State<Arc<AppState>>,
    request: JsonBody<DeploySurveyRequest>,
) -> Result<Json<MessageResponse>, SurveyError> {
    dashboard::deploy_survey(admin, state, request).await
}

#[utoipa::path(
    get,
    path = "/admin/active-survey",
    tag = "dashboard",
    responses(
        (status = 200, description = "Deployed questions in deployment order", body = Vec<ActiveSurveyQuestion>)
    )
)]
pub async fn active_survey(
    state: State<Arc<AppState>>,
) -> Result<Json<Vec<ActiveSurveyQuestion>>, SurveyError> {
    dashboard::active_survey(state).await
}
