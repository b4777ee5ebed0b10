//! Request body extraction that reports failures in the same JSON shape as
//! every other error.

use axum::{
    extract::{FromRequest, OptionalFromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::errors::ApiError;

/// `Json<T>` whose rejection is an [`ApiError::InvalidBody`] (400) instead
/// of axum's plain-text 400/415/422 responses.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = <Json<T> as FromRequest<S>>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

/// A request without a JSON content type yields `None`; a malformed body is
/// still rejected.
impl<T, S> OptionalFromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Option<Self>, Self::Rejection> {
        let body = <Json<T> as OptionalFromRequest<S>>::from_request(req, state).await?;
        Ok(body.map(|Json(value)| Self(value)))
    }
}
