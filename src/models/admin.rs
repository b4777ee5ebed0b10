use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

#[derive(Debug, Clone, FromRow)]
pub struct Admin {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub email: String,
    #[sqlx(rename = "passwords")]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/auth/admin/signup`. Fields are optional so that a
/// missing value is answered with a 400 instead of a deserialization error.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct AdminSignupRequest {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub middlename: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Validated admin signup; the password is hashed when stored
#[derive(Debug, Clone)]
pub struct NewAdmin {
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminResponse {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub middlename: Option<String>,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminLoginResponse {
    pub message: String,
    pub token: String,
    pub user: AdminResponse,
}

impl From<Admin> for AdminResponse {
    fn from(admin: Admin) -> Self {
        Self {
            id: admin.id,
            firstname: admin.firstname,
            lastname: admin.lastname,
            middlename: admin.middlename,
            email: admin.email,
            created_at: admin.created_at,
        }
    }
}
