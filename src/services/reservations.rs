use chrono::{NaiveDate, NaiveTime};

use crate::{
    errors::ReservationError,
    models::{CreateReservationRequest, NewReservation, SURVEY_ANSWER_SLOTS, DOCUMENT_TYPES},
    services::accounts::non_blank,
};

pub fn parse_reserved_date(value: &str) -> Result<NaiveDate, ReservationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ReservationError::InvalidDate { value: value.to_string() })
}

/// Accepts `HH:MM` as sent by time inputs, or `HH:MM:SS`
pub fn parse_reserved_time(value: &str) -> Result<NaiveTime, ReservationError> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .map_err(|_| ReservationError::InvalidTime { value: value.to_string() })
}

pub fn validate_document_type(document_type: &str) -> Result<(), ReservationError> {
    if DOCUMENT_TYPES.contains(&document_type) {
        Ok(())
    } else {
        Err(ReservationError::UnknownDocumentType {
            document_type: document_type.to_string(),
        })
    }
}

/// Checks a reservation request and flattens its survey answers
pub fn new_reservation_from_request(
    student_id: i64,
    request: CreateReservationRequest,
) -> Result<(NewReservation, [String; SURVEY_ANSWER_SLOTS]), ReservationError> {
    let (Some(document_type), Some(reserved_date), Some(reserved_time)) = (
        non_blank(request.document_type),
        non_blank(request.reserved_date),
        non_blank(request.reserved_time),
    ) else {
        return Err(ReservationError::MissingFields);
    };

    validate_document_type(&document_type)?;

    let reservation = NewReservation {
        student_id,
        document_type,
        reserved_date: parse_reserved_date(&reserved_date)?,
        reserved_time: parse_reserved_time(&reserved_time)?,
    };

    let answers = request.survey.unwrap_or_default().to_columns();

    Ok((reservation, answers))
}
