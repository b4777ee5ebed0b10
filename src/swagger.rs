use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;
use axum::Router;
use std::sync::Arc;

use crate::{
    auth::{MeResponse, Role},
    models::{
        ActiveSurveyQuestion, AdminLoginResponse, AdminResponse, AdminSignupRequest,
        CreateReservationRequest, CreateReservationResponse, CreateSurveyRequest,
        CreateSurveyResponse, DeclineRequest, DepartmentCount, DeploySurveyRequest,
        DocumentTypesResponse, ExperienceInput, ImportResponse, LoginRequest, MessageResponse,
        Reservation, ReservationRequest, ReservationStatus, RowError, StudentLoginResponse,
        StudentResponse, StudentSignupRequest, SuccessResponse, SurveyAnswers, SurveyQuestion,
    },
    AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth endpoints
        crate::routes::auth::admin_signup,
        crate::routes::auth::admin_login,
        crate::routes::auth::student_signup,
        crate::routes::auth::student_login,
        crate::routes::auth::me,
        // Document endpoints
        crate::routes::documents::document_types,
        crate::routes::documents::reserve_document,
        crate::routes::documents::my_reservations,
        // Dashboard endpoints
        crate::routes::dashboard::working_summary,
        crate::routes::dashboard::department_summary,
        crate::routes::dashboard::upload_csv,
        crate::routes::dashboard::create_survey,
        crate::routes::dashboard::list_surveys,
        crate::routes::dashboard::deploy_survey,
        crate::routes::dashboard::active_survey,
        crate::routes::admin_surveys::deploy_survey,
        crate::routes::admin_surveys::active_survey,
        // Request approval endpoints
        crate::routes::requests::pending_requests,
        crate::routes::requests::approved_requests,
        crate::routes::requests::declined_requests,
        crate::routes::requests::approve_request,
        crate::routes::requests::decline_request,
        // Upload endpoints
        crate::routes::upload::upload_csv,
        // Event stream
        crate::routes::events::dashboard_events,
    ),
    components(
        schemas(
            Role, MeResponse, AdminSignupRequest, AdminResponse, AdminLoginResponse, LoginRequest,
            StudentSignupRequest, StudentResponse, StudentLoginResponse, ExperienceInput,
            DocumentTypesResponse, CreateReservationRequest, CreateReservationResponse,
            Reservation, ReservationRequest, ReservationStatus, DeclineRequest, SurveyAnswers,
            SurveyQuestion, ActiveSurveyQuestion, CreateSurveyRequest, CreateSurveyResponse,
            DeploySurveyRequest, DepartmentCount, ImportResponse, RowError, MessageResponse,
            SuccessResponse
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "auth", description = "Admin and student authentication"),
        (name = "documents", description = "Student document reservations"),
        (name = "dashboard", description = "Admin dashboard, surveys and CSV import"),
        (name = "requests", description = "Reservation approval"),
        (name = "upload", description = "Alumni CSV upload"),
        (name = "events", description = "Live dashboard notifications"),
    ),
    info(
        title = "Alumnitrack API",
        version = "0.3.0",
        description = "Alumni tracking, graduate surveys and document reservations"
    )
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn create_swagger_router() -> Router<Arc<AppState>> {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}
