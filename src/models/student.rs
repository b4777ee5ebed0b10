use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// Field-of-work value that keeps the free-text `other_work` column
pub const OTHER_FIELD_OF_WORK: &str = "Others";

#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id_number: i64,
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub birthdate: Option<NaiveDate>,
    #[sqlx(rename = "Department")]
    pub department: Option<String>,
    pub year_graduated: Option<String>,
    pub currently_working: Option<String>,
    pub field_of_work: Option<String>,
    pub experience: Option<i32>,
    pub other_work: Option<String>,
    pub company_name: Option<String>,
    pub user_email: Option<String>,
    pub user_password: Option<String>,
    pub user_account: bool,
    pub created_at: DateTime<Utc>,
}

impl Student {
    /// Display name stored with survey answers: "Lastname, Firstname Middlename"
    pub fn survey_name(&self) -> String {
        format!(
            "{}, {} {}",
            self.lastname,
            self.firstname,
            self.middlename.as_deref().unwrap_or("")
        )
        .trim()
        .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentResponse {
    pub id_number: i64,
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub birthdate: Option<NaiveDate>,
    #[serde(rename = "Department")]
    pub department: Option<String>,
    pub year_graduated: Option<String>,
    pub currently_working: Option<String>,
    pub field_of_work: Option<String>,
    pub experience: Option<i32>,
    pub other_work: Option<String>,
    pub company_name: Option<String>,
    pub user_email: Option<String>,
    pub user_account: bool,
}

impl From<Student> for StudentResponse {
    fn from(student: Student) -> Self {
        Self {
            id_number: student.id_number,
            firstname: student.firstname,
            lastname: student.lastname,
            middlename: student.middlename,
            birthdate: student.birthdate,
            department: student.department,
            year_graduated: student.year_graduated,
            currently_working: student.currently_working,
            field_of_work: student.field_of_work,
            experience: student.experience,
            other_work: student.other_work,
            company_name: student.company_name,
            user_email: student.user_email,
            user_account: student.user_account,
        }
    }
}

/// Years of experience arrive either as a JSON number or as form text
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(untagged)]
pub enum ExperienceInput {
    Years(i64),
    Text(String),
}

impl ExperienceInput {
    pub fn years(&self) -> Option<i32> {
        match self {
            ExperienceInput::Years(years) => i32::try_from(*years).ok(),
            ExperienceInput::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// Body of `POST /api/auth/signup`: activates the account of a student
/// whose record was imported beforehand.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct StudentSignupRequest {
    pub firstname: Option<String>,
    pub middlename: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub birthdate: Option<String>,
    pub year_graduated: Option<String>,
    pub department: Option<String>,
    pub password: Option<String>,
    pub currently_working: Option<String>,
    pub field_of_work: Option<String>,
    pub other_work: Option<String>,
    pub experience: Option<ExperienceInput>,
    pub company_name: Option<String>,
}

/// Identity a signing-up student must match against the imported record
#[derive(Debug, Clone)]
pub struct StudentVerification {
    pub firstname: String,
    pub middlename: Option<String>,
    pub lastname: String,
    pub birthdate: NaiveDate,
    pub year_graduated: String,
    pub department: String,
}

#[derive(Debug, Clone)]
pub struct AccountActivation {
    pub email: String,
    pub password: String,
    pub currently_working: Option<String>,
    pub field_of_work: Option<String>,
    pub other_work: Option<String>,
    pub experience: Option<i32>,
    pub company_name: Option<String>,
}

/// One alumni row as produced by the CSV importer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewStudentRecord {
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub department: Option<String>,
    pub year_graduated: Option<String>,
    pub currently_working: Option<String>,
    pub field_of_work: Option<String>,
    pub experience: Option<i32>,
    pub other_work: Option<String>,
    pub company_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudentLoginResponse {
    pub token: String,
    pub student: StudentResponse,
}
