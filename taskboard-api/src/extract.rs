/// Request extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::ApiError;

/// `axum::Json` with rejections reported as [`ApiError`] (400 JSON bodies)
#[derive(Debug, axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// A UUID path segment
///
/// Anything that doesn't parse is reported as not found rather than as a bad
/// request, so malformed ids give away nothing about which ids exist.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound("Not found".to_string()))?;

        Uuid::parse_str(&raw)
            .map(IdPath)
            .map_err(|_| ApiError::NotFound("Not found".to_string()))
    }
}
