/// Authentication endpoints
///
/// Sessions live entirely in the `auth-token` cookie: a signed token naming the
/// user, valid for seven days. There is no server-side session table, so logout
/// only asks the client to drop the cookie.
///
/// # Endpoints
///
/// - `POST /auth/register` - Create an account and sign in
/// - `POST /auth/login` - Sign in with email and password
/// - `POST /auth/logout` - Clear the session cookie
/// - `GET /auth/session` - The signed-in user, or null

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    extract::AppJson,
    routes::MessageResponse,
};
use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{AppendHeaders, IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use taskboard_shared::{
    auth::{
        jwt::{self, SESSION_TTL_SECONDS},
        password,
        session::{session_token, AuthContext, SESSION_COOKIE},
    },
    models::user::{CreateUser, User, UserProfile},
    store::StoreError,
};
use validator::Validate;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Email address
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    /// Password (will be validated for strength)
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    /// Optional display name
    #[validate(length(max = 100, message = "Name must be at most 100 characters"))]
    pub name: Option<String>,
}

/// Login request
///
/// Both fields are optional at the JSON level so a missing one is reported as
/// a 400 with a readable message.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Register and login response
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub message: String,
}

/// Session response; `user` is null when signed out
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user: Option<UserProfile>,
}

/// `Set-Cookie` value carrying a fresh session token
pub fn session_cookie(token: &str, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE, token, SESSION_TTL_SECONDS
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that removes the session cookie
pub fn clear_cookie(secure: bool) -> String {
    let mut cookie = format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE);
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Issues a token for `user` and builds the signed-in response
fn signed_in(
    state: &AppState,
    status: StatusCode,
    user: User,
    message: &str,
) -> ApiResult<Response> {
    let token = jwt::create_token(&jwt::Claims::new(user.id), state.jwt_secret())?;

    Ok((
        status,
        AppendHeaders([(
            header::SET_COOKIE,
            session_cookie(&token, state.secure_cookies()),
        )]),
        Json(AuthResponse {
            user: user.into(),
            message: message.to_string(),
        }),
    )
        .into_response())
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/register
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123",
///   "name": "Jane Doe"
/// }
/// ```
///
/// # Response
///
/// `201 Created` with the session cookie set:
///
/// ```json
/// {
///   "user": { "id": "uuid", "name": "Jane Doe", "email": "user@example.com", "image": null },
///   "message": "Account created"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed
/// - `409 Conflict`: Email already registered
pub async fn register(
    State(state): State<AppState>,
    AppJson(mut req): AppJson<RegisterRequest>,
) -> ApiResult<Response> {
    req.email = normalize_email(&req.email);
    req.name = req
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    req.validate()?;

    password::validate_password_strength(&req.password)
        .map_err(|message| ApiError::invalid_field("password", message))?;

    let password_hash = password::hash_password(&req.password)?;

    let user = state
        .store
        .create_user(CreateUser {
            email: req.email,
            password_hash,
            name: req.name,
            image: None,
        })
        .await
        .map_err(|e| match e {
            StoreError::AlreadyExists => ApiError::Conflict("Email already registered".to_string()),
            other => other.into(),
        })?;

    tracing::info!(user_id = %user.id, "User registered");

    signed_in(&state, StatusCode::CREATED, user, "Account created")
}

/// Login endpoint
///
/// # Endpoint
///
/// ```text
/// POST /auth/login
/// Content-Type: application/json
///
/// {
///   "email": "user@example.com",
///   "password": "SecureP@ss123"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Email or password missing
/// - `401 Unauthorized`: Unknown email or wrong password (same message for both)
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Response> {
    let email = req.email.as_deref().map(normalize_email).unwrap_or_default();
    let password = req.password.unwrap_or_default();
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let Some(user) = state.store.find_user_by_email(&email).await? else {
        // Same hashing cost as a wrong password
        password::verify_dummy(&password);
        tracing::debug!("Login rejected: unknown email");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    if !password::verify_password(&password, &user.password_hash)? {
        tracing::debug!(user_id = %user.id, "Login rejected: wrong password");
        return Err(ApiError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    tracing::info!(user_id = %user.id, "User logged in");

    signed_in(&state, StatusCode::OK, user, "Logged in")
}

/// Logout endpoint
///
/// Always succeeds. Tokens are stateless, so one copied before logout stays
/// valid until it expires.
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, clear_cookie(state.secure_cookies()))]),
        Json(MessageResponse::new("Logged out")),
    )
}

/// Current session
///
/// A token that was sent but didn't resolve is cleared from the client.
pub async fn session(
    State(state): State<AppState>,
    ctx: Option<Extension<AuthContext>>,
    headers: HeaderMap,
) -> Response {
    match ctx {
        Some(Extension(ctx)) => Json(SessionResponse {
            user: Some(ctx.user),
        })
        .into_response(),
        None if session_token(&headers).is_some() => (
            AppendHeaders([(header::SET_COOKIE, clear_cookie(state.secure_cookies()))]),
            Json(SessionResponse { user: None }),
        )
            .into_response(),
        None => Json(SessionResponse { user: None }).into_response(),
    }
}
