use axum::{
    extract::{Multipart, State},
    response::Json,
    routing::post,
    Router,
};
use std::sync::Arc;

use crate::{
    auth::AdminUser,
    errors::ImportError,
    models::ImportResponse,
    services::csv_import::{import_students, read_csv_upload},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/csv", post(upload_csv))
}

#[utoipa::path(
    post,
    path = "/api/upload/csv",
    tag = "upload",
    security(
        ("bearer_auth" = [])
    ),
    request_body(content = String, description = "Multipart form with a `file` field", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Rows imported", body = ImportResponse),
        (status = 400, description = "No file uploaded"),
        (status = 413, description = "File exceeds the configured size limit"),
        (status = 500, description = "Failed to insert CSV data")
    )
)]
pub async fn upload_csv(
    _admin: AdminUser,
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ImportError> {
    let data = read_csv_upload(&mut multipart, "file", state.config.max_csv_size_bytes()).await?;
    let response = import_students(&state.db, &state.events, &data).await?;
    Ok(Json(response))
}
