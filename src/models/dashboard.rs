use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Colleges shown on the dashboard charts
pub const TRACKED_DEPARTMENTS: [&str; 3] = ["COT", "COED", "COHTM"];

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema, PartialEq)]
pub struct DepartmentCount {
    #[serde(rename = "Department")]
    #[sqlx(rename = "Department")]
    pub department: String,
    pub count: i64,
}
