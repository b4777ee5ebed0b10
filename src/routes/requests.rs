use axum::{
    extract::{Path, State},
    response::Json,
    routing::{get, put},
    Router,
};
use std::sync::Arc;
use tracing::error;

use crate::{
    auth::AdminUser,
    errors::ReservationError,
    extract::JsonBody,
    models::{DeclineRequest, ReservationRequest, ReservationStatus, SuccessResponse},
    services::accounts::non_blank,
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pending", get(pending_requests))
        .route("/approved", get(approved_requests))
        .route("/declined", get(declined_requests))
        .route("/{id}/approve", put(approve_request))
        .route("/{id}/decline", put(decline_request))
}

async fn requests_with_status(
    state: &AppState,
    status: ReservationStatus,
) -> Result<Json<Vec<ReservationRequest>>, ReservationError> {
    let requests = state.db.get_reservations_by_status(status).await.map_err(|e| {
        error!("Error fetching {} requests: {}", status, e);
        ReservationError::internal(e)
    })?;

    Ok(Json(requests))
}

#[utoipa::path(
    get,
    path = "/api/requests/pending",
    tag = "requests",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Reservations awaiting a decision", body = Vec<ReservationRequest>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn pending_requests(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReservationRequest>>, ReservationError> {
    requests_with_status(&state, ReservationStatus::Pending).await
}

#[utoipa::path(
    get,
    path = "/api/requests/approved",
    tag = "requests",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Approved reservations", body = Vec<ReservationRequest>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn approved_requests(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReservationRequest>>, ReservationError> {
    requests_with_status(&state, ReservationStatus::Approved).await
}

#[utoipa::path(
    get,
    path = "/api/requests/declined",
    tag = "requests",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Declined reservations with their reasons", body = Vec<ReservationRequest>),
        (status = 403, description = "Admin access required")
    )
)]
pub async fn declined_requests(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ReservationRequest>>, ReservationError> {
    requests_with_status(&state, ReservationStatus::Declined).await
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}/approve",
    tag = "requests",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation approved", body = SuccessResponse),
        (status = 404, description = "Request not found")
    )
)]
pub async fn approve_request(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<SuccessResponse>, ReservationError> {
    let updated = state
        .db
        .set_reservation_status(id, ReservationStatus::Approved, None)
        .await
        .map_err(|e| {
            error!("Error approving request {}: {}", id, e);
            ReservationError::internal(e)
        })?;

    if !updated {
        return Err(ReservationError::NotFound { id });
    }

    Ok(Json(SuccessResponse { success: true }))
}

#[utoipa::path(
    put,
    path = "/api/requests/{id}/decline",
    tag = "requests",
    security(
        ("bearer_auth" = [])
    ),
    params(
        ("id" = i64, Path, description = "Reservation ID")
    ),
    request_body = DeclineRequest,
    responses(
        (status = 200, description = "Reservation declined", body = SuccessResponse),
        (status = 404, description = "Request not found")
    )
)]
pub async fn decline_request(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    body: Option<JsonBody<DeclineRequest>>,
) -> Result<Json<SuccessResponse>, ReservationError> {
    let reason = body.and_then(|JsonBody(request)| non_blank(request.reason));

    let updated = state
        .db
        .set_reservation_status(id, ReservationStatus::Declined, reason)
        .await
        .map_err(|e| {
            error!("Error declining request {}: {}", id, e);
            ReservationError::internal(e)
        })?;

    if !updated {
        return Err(ReservationError::NotFound { id });
    }

    Ok(Json(SuccessResponse { success: true }))
}
