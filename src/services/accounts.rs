use std::sync::LazyLock;

use regex::Regex;

use crate::{
    errors::AuthError,
    models::{
        AccountActivation, AdminSignupRequest, NewAdmin, StudentSignupRequest, StudentVerification,
        OTHER_FIELD_OF_WORK,
    },
    services::csv_import::parse_birthdate,
};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Trimmed value, or None when absent or blank
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn normalize_email(email: String) -> Result<String, AuthError> {
    let email = email.to_lowercase();
    if !EMAIL_RE.is_match(&email) {
        return Err(AuthError::InvalidField { field: "email", value: email });
    }
    Ok(email)
}

/// Normalizes a login e-mail the same way signup stored it
pub fn login_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn new_admin_from_request(request: AdminSignupRequest) -> Result<NewAdmin, AuthError> {
    let (Some(firstname), Some(lastname), Some(email), Some(password)) = (
        non_blank(request.firstname),
        non_blank(request.lastname),
        non_blank(request.email),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AuthError::missing_fields("Missing required fields"));
    };

    Ok(NewAdmin {
        firstname,
        lastname,
        middlename: non_blank(request.middlename),
        email: normalize_email(email)?,
        password,
    })
}

/// Splits a student signup into the identity to verify and the account
/// data to store once verified.
pub fn student_signup_from_request(
    request: StudentSignupRequest,
) -> Result<(StudentVerification, AccountActivation), AuthError> {
    let (
        Some(firstname),
        Some(lastname),
        Some(email),
        Some(birthdate),
        Some(year_graduated),
        Some(department),
        Some(password),
    ) = (
        non_blank(request.firstname),
        non_blank(request.lastname),
        non_blank(request.email),
        non_blank(request.birthdate),
        non_blank(request.year_graduated),
        non_blank(request.department),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AuthError::missing_fields("All required fields must be filled."));
    };

    let birthdate = parse_birthdate(&birthdate)
        .ok_or(AuthError::InvalidField { field: "birthdate", value: birthdate })?;

    let field_of_work = non_blank(request.field_of_work);
    let other_work = if field_of_work.as_deref() == Some(OTHER_FIELD_OF_WORK) {
        non_blank(request.other_work)
    } else {
        None
    };

    let verification = StudentVerification {
        firstname,
        middlename: non_blank(request.middlename),
        lastname,
        birthdate,
        year_graduated,
        department,
    };

    let activation = AccountActivation {
        email: normalize_email(email)?,
        password,
        currently_working: non_blank(request.currently_working),
        field_of_work,
        other_work,
        experience: request.experience.and_then(|e| e.years()),
        company_name: non_blank(request.company_name),
    };

    Ok((verification, activation))
}
