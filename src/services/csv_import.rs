//! Alumni CSV import.
//!
//! Uploads are parsed entirely in memory. Rows that cannot be turned into a
//! student record are skipped and reported back with their line number;
//! only a missing header, an oversized file or a database failure aborts
//! the import as a whole. A header without `firstname` or `lastname` is not
//! an error in itself: every row then fails the name check and is skipped.

use axum::{
    extract::{multipart::MultipartError, Multipart},
    http::StatusCode,
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::collections::HashMap;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    db::Database,
    errors::ImportError,
    models::{ImportResponse, NewStudentRecord, RowError},
    services::events::{DashboardEvent, EventBroadcaster},
};

/// Outcome of parsing an upload, before anything touches the database
#[derive(Debug, Default)]
pub struct ParsedImport {
    pub records: Vec<NewStudentRecord>,
    pub errors: Vec<RowError>,
}

/// Column positions resolved from the header row
struct ColumnMap {
    positions: HashMap<String, usize>,
}

impl ColumnMap {
    fn from_headers(headers: &StringRecord) -> Result<Self, ImportError> {
        let positions: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let name = name.trim_start_matches('\u{feff}').trim().to_lowercase();
                (name, index)
            })
            .filter(|(name, _)| !name.is_empty())
            .collect();

        if positions.is_empty() {
            return Err(ImportError::MissingHeader);
        }

        Ok(Self { positions })
    }

    /// Trimmed value of `column`, or None when absent or blank
    fn get(&self, record: &StringRecord, column: &str) -> Option<String> {
        let index = *self.positions.get(column)?;
        record
            .get(index)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    }
}

/// Parses uploaded CSV bytes into student records
pub fn parse_students_csv(data: &[u8]) -> Result<ParsedImport, ImportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(data);

    let headers = reader.headers().map_err(|_| ImportError::MissingHeader)?.clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut parsed = ParsedImport::default();

    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map(|p| p.line()).unwrap_or(0);
                match record_from_row(&columns, &record) {
                    Ok(student) => parsed.records.push(student),
                    Err(message) => parsed.errors.push(RowError { line, message }),
                }
            }
            Err(e) => {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                parsed.errors.push(RowError {
                    line,
                    message: describe_csv_error(&e),
                });
            }
        }
    }

    Ok(parsed)
}

fn record_from_row(columns: &ColumnMap, record: &StringRecord) -> Result<NewStudentRecord, String> {
    let firstname = columns
        .get(record, "firstname")
        .ok_or_else(|| "missing firstname".to_string())?;
    let lastname = columns
        .get(record, "lastname")
        .ok_or_else(|| "missing lastname".to_string())?;

    Ok(NewStudentRecord {
        firstname,
        lastname,
        middlename: columns.get(record, "middlename"),
        birthdate: columns.get(record, "birthdate").and_then(|v| parse_birthdate(&v)),
        department: columns.get(record, "department"),
        year_graduated: columns.get(record, "year_graduated"),
        currently_working: columns.get(record, "currently_working"),
        field_of_work: columns.get(record, "field_of_work"),
        experience: columns.get(record, "experience").and_then(|v| parse_experience(&v)),
        other_work: columns.get(record, "other_work"),
        company_name: columns.get(record, "company_name"),
    })
}

/// Whole years of experience. Anything but a plain integer is dropped.
pub fn parse_experience(value: &str) -> Option<i32> {
    value.trim().parse::<i32>().ok()
}

pub fn parse_birthdate(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

fn describe_csv_error(error: &csv::Error) -> String {
    match error.kind() {
        csv::ErrorKind::UnequalLengths { expected_len, len, .. } => {
            format!("expected {} fields, found {}", expected_len, len)
        }
        csv::ErrorKind::Utf8 { .. } => "row is not valid UTF-8".to_string(),
        _ => error.to_string(),
    }
}

/// Pulls the named file field out of a multipart body, enforcing `limit`
pub async fn read_csv_upload(
    multipart: &mut Multipart,
    field_name: &str,
    limit: usize,
) -> Result<Vec<u8>, ImportError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_failure("Failed to get multipart field", e, limit))?
    {
        if field.name() != Some(field_name) {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload.csv").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_failure("Failed to read CSV data", e, limit))?;

        if data.len() > limit {
            warn!("CSV '{}' is {} bytes, over the {} byte limit", filename, data.len(), limit);
            return Err(ImportError::TooLarge { limit });
        }

        info!("Received CSV upload '{}' ({} bytes)", filename, data.len());
        return Ok(data.to_vec());
    }

    Err(ImportError::NoFile)
}

/// The request body limit surfaces as a multipart error; it still means the
/// file was too large.
fn multipart_failure(context: &str, e: MultipartError, limit: usize) -> ImportError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        warn!("{}: body exceeded the upload limit: {}", context, e);
        return ImportError::TooLarge { limit };
    }
    error!("{}: {}", context, e);
    ImportError::Multipart { message: e.to_string() }
}

/// Parses and stores an upload, then tells connected dashboards about it
pub async fn import_students(
    db: &Database,
    events: &EventBroadcaster,
    data: &[u8],
) -> Result<ImportResponse, ImportError> {
    let batch_id = Uuid::new_v4();
    let parsed = parse_students_csv(data)?;

    for row_error in &parsed.errors {
        warn!("CSV import {}: skipping line {}: {}", batch_id, row_error.line, row_error.message);
    }

    let inserted = if parsed.records.is_empty() {
        0
    } else {
        db.insert_students_batch(&parsed.records).await.map_err(|e| {
            error!("Error inserting CSV data: {}", e);
            ImportError::InsertFailed { message: e.to_string() }
        })?
    };

    info!(
        "CSV import {} finished: {} inserted, {} skipped",
        batch_id,
        inserted,
        parsed.errors.len()
    );

    events.publish(DashboardEvent::DataUpdated { batch_id, inserted });

    Ok(ImportResponse {
        message: "CSV uploaded and data inserted successfully".to_string(),
        batch_id,
        inserted,
        skipped: parsed.errors.len(),
        errors: parsed.errors,
    })
}
