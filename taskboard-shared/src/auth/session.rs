/// Session resolution
///
/// Turns the `auth-token` cookie of a request into an [`AuthContext`], or into
/// nothing. Resolution never fails: every problem (missing cookie, bad signature,
/// expired token, deleted user, storage error) means "unauthenticated", and the
/// caller decides whether that is acceptable for the route.
///
/// # Example
///
/// ```no_run
/// use axum::http::HeaderMap;
/// use taskboard_shared::auth::session::{resolve_session, session_token};
/// use taskboard_shared::store::MemoryStore;
///
/// # async fn example(headers: HeaderMap) {
/// let store = MemoryStore::new();
/// let secret = "a-secret-key-of-at-least-32-bytes!";
///
/// match resolve_session(&store, secret, session_token(&headers)).await {
///     Some(ctx) => println!("signed in as {}", ctx.user.email),
///     None => println!("anonymous"),
/// }
/// # }
/// ```

use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use super::jwt::validate_token;
use crate::models::user::UserProfile;
use crate::store::Store;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "auth-token";

/// The authenticated caller of a request
///
/// Built once per request by the session middleware and passed explicitly to
/// every service call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub user: UserProfile,
}

impl AuthContext {
    pub fn new(user: UserProfile) -> Self {
        Self { user }
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

/// Extracts the session token from the request's `Cookie` headers
///
/// Returns None if the cookie is absent or empty.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}

/// Resolves a session token to the user it names
///
/// Returns None for a missing or invalid token, a user that no longer exists,
/// or a storage failure (logged at warn).
pub async fn resolve_session(
    store: &dyn Store,
    secret: &str,
    token: Option<&str>,
) -> Option<AuthContext> {
    let token = token?;

    let claims = match validate_token(token, secret) {
        Ok(claims) => claims,
        Err(e) => {
            debug!(error = %e, "Rejected session token");
            return None;
        }
    };

    match store.find_user_by_id(claims.sub).await {
        Ok(Some(user)) => Some(AuthContext::new(UserProfile::from(user))),
        Ok(None) => {
            debug!(user_id = %claims.sub, "Session token for unknown user");
            None
        }
        Err(e) => {
            warn!(error = %e, user_id = %claims.sub, "Failed to load session user");
            None
        }
    }
}
