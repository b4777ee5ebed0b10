use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use super::SurveyAnswers;

/// Documents a student may reserve
pub const DOCUMENT_TYPES: [&str; 4] = [
    "TOR",
    "Good Moral",
    "Certificate of Enrollment",
    "Transfer Credentials",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum ReservationStatus {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "approved")]
    Approved,
    #[serde(rename = "declined")]
    Declined,
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReservationStatus::Pending => write!(f, "pending"),
            ReservationStatus::Approved => write!(f, "approved"),
            ReservationStatus::Declined => write!(f, "declined"),
        }
    }
}

impl TryFrom<String> for ReservationStatus {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "pending" => Ok(ReservationStatus::Pending),
            "approved" => Ok(ReservationStatus::Approved),
            "declined" => Ok(ReservationStatus::Declined),
            _ => Err(format!("Invalid reservation status: {}", value)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Reservation {
    pub id: i64,
    pub student_id: i64,
    pub document_type: String,
    pub reserved_date: NaiveDate,
    pub reserved_time: NaiveTime,
    #[sqlx(try_from = "String")]
    pub status: ReservationStatus,
    pub decline_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reservation row as listed on the admin approval pages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ReservationRequest {
    pub id: i64,
    pub document_type: String,
    pub reserved_date: NaiveDate,
    pub reserved_time: NaiveTime,
    pub student_name: String,
    pub decline_reason: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub document_type: Option<String>,
    pub reserved_date: Option<String>,
    pub reserved_time: Option<String>,
    #[serde(default)]
    pub survey: Option<SurveyAnswers>,
}

/// A reservation that passed validation, ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub student_id: i64,
    pub document_type: String,
    pub reserved_date: NaiveDate,
    pub reserved_time: NaiveTime,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateReservationResponse {
    pub message: String,
    #[serde(rename = "reservationId")]
    pub reservation_id: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct DeclineRequest {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentTypesResponse {
    pub types: Vec<String>,
}

impl DocumentTypesResponse {
    pub fn all() -> Self {
        Self {
            types: DOCUMENT_TYPES.iter().map(|t| t.to_string()).collect(),
        }
    }
}
