/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use taskboard_api::{app::AppState, config::Config};
/// use taskboard_shared::store::PgStore;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = taskboard_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::{config::Config, error::ApiError, middleware::security::SecurityHeadersLayer};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use taskboard_shared::{
    auth::session::{resolve_session, session_token, AuthContext},
    store::Store,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Persistent storage
    pub store: Arc<dyn Store>,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// Gets JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }

    /// Whether cookies are marked `Secure`
    pub fn secure_cookies(&self) -> bool {
        self.config.api.production
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET  /health                  # Health check (public)
/// ├── /auth/                        # Session endpoints (public)
/// │   ├── POST /register
/// │   ├── POST /login
/// │   ├── POST /logout
/// │   └── GET  /session
/// ├── /projects                     # Session required
/// │   ├── GET    /
/// │   ├── POST   /
/// │   ├── GET    /:id
/// │   ├── PUT    /:id
/// │   ├── DELETE /:id
/// │   └── GET    /:id/members
/// └── /tasks                        # Session required
///     ├── POST   /
///     ├── PUT    /:id
///     └── DELETE /:id
/// ```
///
/// # Middleware Stack
///
/// Applied in order (innermost first):
/// 1. `require_session` on project and task routes (401 without a session)
/// 2. `session_layer` resolves the `auth-token` cookie into an [`AuthContext`]
/// 3. Logging (tower-http TraceLayer)
/// 4. CORS (tower-http CorsLayer)
/// 5. Security headers
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let public_routes = Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/session", get(routes::auth::session));

    let protected_routes = Router::new()
        .route(
            "/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/projects/:id",
            get(routes::projects::get_project)
                .put(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/projects/:id/members", get(routes::projects::list_members))
        .route("/tasks", post(routes::tasks::create_task))
        .route(
            "/tasks/:id",
            put(routes::tasks::update_task).delete(routes::tasks::delete_task),
        )
        .route_layer(axum::middleware::from_fn(require_session));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            session_layer,
        ))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_layer(&state.config))
        .layer(SecurityHeadersLayer::new(state.config.api.production))
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    if config.allows_any_origin() {
        // Development mode: permissive CORS (no credentials)
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .api
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
        .max_age(std::time::Duration::from_secs(3600))
}

/// Session middleware layer
///
/// Resolves the `auth-token` cookie and, when it names a live user, injects an
/// [`AuthContext`] into the request extensions. Never rejects a request.
async fn session_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let ctx = resolve_session(
        state.store.as_ref(),
        state.jwt_secret(),
        session_token(req.headers()),
    )
    .await;

    if let Some(ctx) = ctx {
        req.extensions_mut().insert(ctx);
    }

    next.run(req).await
}

/// Rejects requests without a resolved session
async fn require_session(req: Request, next: Next) -> Result<Response, ApiError> {
    if req.extensions().get::<AuthContext>().is_none() {
        return Err(ApiError::unauthenticated());
    }

    Ok(next.run(req).await)
}
