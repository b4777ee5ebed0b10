use anyhow::Result;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{errors::AuthError, AppState};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "student")]
    Student,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// Token payload. `sub` is `admin_info.id` for admins and
/// `students.id_number` for students.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponse {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

/// Any caller holding a valid bearer token
pub struct AuthUser {
    pub claims: Claims,
}

/// Caller holding an admin token
pub struct AdminUser {
    pub claims: Claims,
}

/// Caller holding a student token
pub struct StudentUser {
    pub claims: Claims,
}

impl StudentUser {
    pub fn id_number(&self) -> i64 {
        self.claims.sub
    }
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token_from_headers(&parts.headers).ok_or(AuthError::MissingToken)?;

        let claims = verify_jwt(&token, &state.config.jwt_secret)
            .map_err(|_| AuthError::InvalidToken)?;

        Ok(AuthUser { claims })
    }
}

impl FromRequestParts<Arc<AppState>> for AdminUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { claims } = AuthUser::from_request_parts(parts, state).await?;
        require_role(&claims, Role::Admin)?;
        Ok(AdminUser { claims })
    }
}

impl FromRequestParts<Arc<AppState>> for StudentUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser { claims } = AuthUser::from_request_parts(parts, state).await?;
        require_role(&claims, Role::Student)?;
        Ok(StudentUser { claims })
    }
}

pub fn require_role(claims: &Claims, role: Role) -> Result<(), AuthError> {
    if claims.role != role {
        return Err(AuthError::Forbidden { role: claims.role.to_string() });
    }
    Ok(())
}

pub fn create_jwt(sub: i64, email: &str, role: Role, secret: &str, ttl_hours: i64) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(ttl_hours))
        .ok_or_else(|| anyhow::anyhow!("token expiry overflows"))?
        .timestamp();

    let claims = Claims {
        sub,
        email: email.to_string(),
        role,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

pub fn verify_jwt(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;

    Ok(token_data.claims)
}

fn extract_token_from_headers(headers: &HeaderMap) -> Option<String> {
    let auth_header = headers.get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn extracts_bearer_token() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(extract_token_from_headers(&headers).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn rejects_other_schemes_and_empty_tokens() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Basic dXNlcjpwYXNz"));
        assert!(extract_token_from_headers(&headers).is_none());

        headers.insert("authorization", HeaderValue::from_static("Bearer "));
        assert!(extract_token_from_headers(&headers).is_none());

        assert!(extract_token_from_headers(&HeaderMap::new()).is_none());
    }
}
