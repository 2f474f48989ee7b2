/// Project, task and member operations
///
/// Each operation takes the store, the caller's [`AuthContext`] and the request
/// input, and follows the same sequence: authorize against the project, then
/// validate the input, then touch the store. Authorizing first means a viewer
/// always gets `Forbidden` and a non-member always gets `NotFoundOrForbidden`,
/// whatever they sent.
///
/// Request bodies arrive as a [`Payload`]: raw JSON from HTTP is only
/// deserialized after authorization, so a wrong-typed field is reported to
/// editors only.
///
/// [`AuthContext`]: crate::auth::session::AuthContext

pub mod members;
pub mod projects;
pub mod tasks;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::auth::authorization::AuthzError;
use crate::store::StoreError;

/// Error type for service operations
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Input failed validation
    #[error("{field}: {message}")]
    Validation { field: &'static str, message: String },

    /// Resource doesn't exist or the caller isn't a member of its project
    #[error("Not found")]
    NotFoundOrForbidden,

    /// Caller's role doesn't allow the operation
    #[error("Forbidden")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ServiceError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ServiceError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(err: AuthzError) -> Self {
        match err {
            AuthzError::NotFoundOrForbidden => ServiceError::NotFoundOrForbidden,
            AuthzError::Forbidden => ServiceError::Forbidden,
            AuthzError::Store(e) => ServiceError::Store(e),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// A request body, typed or still raw JSON
#[derive(Debug, Clone)]
pub enum Payload<T> {
    /// Already deserialized input
    Typed(T),
    /// JSON as received; deserialized by [`Payload::parse`]
    Json(Value),
}

impl<T: DeserializeOwned> Payload<T> {
    /// The typed input; a body that doesn't fit `T` is a validation error
    pub(crate) fn parse(self) -> ServiceResult<T> {
        match self {
            Payload::Typed(input) => Ok(input),
            Payload::Json(body) => serde_json::from_value(body).map_err(|e| {
                ServiceError::validation("body", format!("Invalid request body: {}", e))
            }),
        }
    }
}

impl<T> From<T> for Payload<T> {
    fn from(input: T) -> Self {
        Payload::Typed(input)
    }
}

/// Distinguishes an absent field from an explicit `null`
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`: a missing
/// key stays `None`, `null` becomes `Some(None)`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Trims a value; empty or whitespace-only becomes None
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
