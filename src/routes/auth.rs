use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::{
    auth::{create_jwt, AuthUser, MeResponse, Role},
    db::is_unique_violation,
    errors::AuthError,
    extract::JsonBody,
    models::{
        AdminLoginResponse, AdminSignupRequest, LoginRequest, MessageResponse,
        StudentLoginResponse, StudentSignupRequest,
    },
    services::accounts::{login_email, new_admin_from_request, non_blank, student_signup_from_request},
    AppState,
};

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/signup", post(admin_signup))
        .route("/admin/login", post(admin_login))
        .route("/signup", post(student_signup))
        .route("/login", post(student_login))
        .route("/me", get(me))
}

/// Email and password from a login body, or a 400
fn credentials(request: LoginRequest) -> Result<(String, String), AuthError> {
    match (non_blank(request.email), request.password.filter(|p| !p.is_empty())) {
        (Some(email), Some(password)) => Ok((login_email(&email), password)),
        _ => Err(AuthError::missing_fields("Email and password are required.")),
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/admin/signup",
    tag = "auth",
    request_body = AdminSignupRequest,
    responses(
        (status = 200, description = "Admin registered", body = MessageResponse),
        (status = 400, description = "Missing required fields"),
        (status = 403, description = "Admin signup disabled"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn admin_signup(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<AdminSignupRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    if !state.config.allow_admin_signup {
        return Err(AuthError::SignupDisabled);
    }

    let new_admin = new_admin_from_request(request)?;

    let existing = state
        .db
        .get_admin_by_email(&new_admin.email)
        .await
        .map_err(AuthError::internal)?;
    if existing.is_some() {
        return Err(AuthError::DuplicateEmail { email: new_admin.email });
    }

    let email = new_admin.email.clone();
    let admin = state.db.create_admin(new_admin).await.map_err(|e| {
        if is_unique_violation(&e) {
            AuthError::DuplicateEmail { email: email.clone() }
        } else {
            error!("Signup error: {}", e);
            AuthError::internal(e)
        }
    })?;

    info!("Registered admin {} ({})", admin.id, admin.email);
    Ok(Json(MessageResponse::new("User registered")))
}

#[utoipa::path(
    post,
    path = "/api/auth/admin/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AdminLoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn admin_login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<AdminLoginResponse>, AuthError> {
    let (email, password) = credentials(request)?;

    let admin = state
        .db
        .get_admin_by_email(&email)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::InvalidCredentials)?;

    let is_valid = bcrypt::verify(&password, &admin.password_hash).map_err(AuthError::internal)?;
    if !is_valid {
        warn!("Failed admin login for {}", email);
        return Err(AuthError::InvalidCredentials);
    }

    let token = create_jwt(
        admin.id,
        &admin.email,
        Role::Admin,
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )
    .map_err(AuthError::internal)?;

    Ok(Json(AdminLoginResponse {
        message: "Login successful".to_string(),
        token,
        user: admin.into(),
    }))
}

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    tag = "auth",
    request_body = StudentSignupRequest,
    responses(
        (status = 200, description = "Account created", body = MessageResponse),
        (status = 400, description = "Missing fields, no matching student record, or account already exists"),
        (status = 409, description = "Email already bound to another student")
    )
)]
pub async fn student_signup(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<StudentSignupRequest>,
) -> Result<Json<MessageResponse>, AuthError> {
    let (verification, activation) = student_signup_from_request(request)?;

    let student = state
        .db
        .find_student_for_verification(&verification)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::VerificationFailed)?;

    if student.user_account {
        return Err(AuthError::AccountExists { id_number: student.id_number });
    }

    let email_owner = state
        .db
        .get_student_by_email(&activation.email)
        .await
        .map_err(AuthError::internal)?;
    if email_owner.is_some_and(|owner| owner.id_number != student.id_number) {
        return Err(AuthError::DuplicateEmail { email: activation.email });
    }

    let email = activation.email.clone();
    let activated = state
        .db
        .activate_student_account(student.id_number, activation)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::DuplicateEmail { email: email.clone() }
            } else {
                error!("Update error: {}", e);
                AuthError::internal(e)
            }
        })?;

    if !activated {
        return Err(AuthError::AccountExists { id_number: student.id_number });
    }

    info!("Activated account for student {}", student.id_number);
    Ok(Json(MessageResponse::new("Account created successfully!")))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = StudentLoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn student_login(
    State(state): State<Arc<AppState>>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<StudentLoginResponse>, AuthError> {
    let (email, password) = credentials(request)?;

    let student = state
        .db
        .get_student_by_email(&email)
        .await
        .map_err(AuthError::internal)?
        .ok_or(AuthError::InvalidCredentials)?;

    let password_hash = student
        .user_password
        .as_deref()
        .filter(|_| student.user_account)
        .ok_or(AuthError::InvalidCredentials)?;

    let is_valid = bcrypt::verify(&password, password_hash).map_err(AuthError::internal)?;
    if !is_valid {
        warn!("Failed student login for {}", email);
        return Err(AuthError::InvalidCredentials);
    }

    let token = create_jwt(
        student.id_number,
        &email,
        Role::Student,
        &state.config.jwt_secret,
        state.config.jwt_expiry_hours,
    )
    .map_err(AuthError::internal)?;

    Ok(Json(StudentLoginResponse {
        token,
        student: student.into(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "auth",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Identity carried by the token", body = MeResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn me(auth_user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        id: auth_user.claims.sub,
        email: auth_user.claims.email,
        role: auth_user.claims.role,
    })
}
