use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::error;

use crate::{
    auth::StudentUser,
    errors::ReservationError,
    extract::JsonBody,
    models::{
        CreateReservationRequest, CreateReservationResponse, DocumentTypesResponse, Reservation,
    },
    services::reservations::new_reservation_from_request,
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/types", get(document_types))
        .route("/reserve", post(reserve_document))
        .route("/my", get(my_reservations))
}

#[utoipa::path(
    get,
    path = "/api/documents/types",
    tag = "documents",
    responses(
        (status = 200, description = "Documents that can be reserved", body = DocumentTypesResponse)
    )
)]
pub async fn document_types() -> Json<DocumentTypesResponse> {
    Json(DocumentTypesResponse::all())
}

#[utoipa::path(
    post,
    path = "/api/documents/reserve",
    tag = "documents",
    security(
        ("bearer_auth" = [])
    ),
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created", body = CreateReservationResponse),
        (status = 400, description = "Missing or invalid reservation fields"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Token does not belong to a student"),
        (status = 404, description = "Student record no longer exists")
    )
)]
pub async fn reserve_document(
    student: StudentUser,
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<CreateReservationRequest>,
) -> Result<Json<CreateReservationResponse>, ReservationError> {
    let student_id = student.id_number();
    let (reservation, answers) = new_reservation_from_request(student_id, request)?;

    let record = state
        .db
        .get_student_by_id(student_id)
        .await
        .map_err(ReservationError::internal)?
        .ok_or(ReservationError::StudentNotFound { id_number: student_id })?;

    let reservation_id = state
        .db
        .create_reservation_with_survey(&reservation, &record.survey_name(), &answers)
        .await
        .map_err(|e| {
            error!("Reservation insert error: {}", e);
            ReservationError::internal(e)
        })?;

    Ok(Json(CreateReservationResponse {
        message: "Reservation and survey created".to_string(),
        reservation_id,
    }))
}

#[utoipa::path(
    get,
    path = "/api/documents/my",
    tag = "documents",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Caller's reservations, newest first", body = Vec<Reservation>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Token does not belong to a student")
    )
)]
pub async fn my_reservations(
    student: StudentUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Reservation>>, ReservationError> {
    let reservations = state
        .db
        .get_reservations_for_student(student.id_number())
        .await
        .map_err(|e| {
            error!("Fetch reservations error: {}", e);
            ReservationError::internal(e)
        })?;

    Ok(Json(reservations))
}
