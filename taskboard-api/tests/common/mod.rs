//! Common test utilities for integration tests
//!
//! This module provides shared infrastructure for integration tests:
//! - A full router over an in-memory store (no database needed)
//! - Test user creation with a real password hash
//! - Session cookie generation
//! - A request helper returning status, headers and JSON body

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use taskboard_api::app::{build_router, AppState};
use taskboard_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use taskboard_shared::auth::jwt::{create_token, Claims};
use taskboard_shared::auth::password::hash_password;
use taskboard_shared::models::membership::ProjectRole;
use taskboard_shared::models::user::{CreateUser, User};
use taskboard_shared::store::{MemoryStore, Store};
use tower::Service as _;
use uuid::Uuid;

pub const TEST_SECRET: &str = "integration-test-secret-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "SecureP@ss123";

/// Test context containing all necessary resources
pub struct TestContext {
    pub store: MemoryStore,
    pub app: axum::Router,
    pub config: Config,
}

/// A signed-in test user
pub struct TestUser {
    pub user: User,
    pub cookie: String,
}

impl TestUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }
}

/// A decoded response
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// The `Set-Cookie` header, if any
    pub fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            production: false,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: "postgresql://unused".to_string(),
            max_connections: 1,
            run_migrations: false,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
    }
}

impl TestContext {
    /// Creates a new test context with an empty store
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    pub fn with_config(config: Config) -> Self {
        let store = MemoryStore::new();
        let state = AppState::new(Arc::new(store.clone()), config.clone());
        let app = build_router(state);

        Self { store, app, config }
    }

    /// Creates a user whose password is [`TEST_PASSWORD`], with a valid session cookie
    pub async fn create_user(&self, email: &str, name: Option<&str>) -> TestUser {
        let user = self
            .store
            .create_user(CreateUser {
                email: email.to_string(),
                password_hash: hash_password(TEST_PASSWORD).unwrap(),
                name: name.map(str::to_string),
                image: None,
            })
            .await
            .unwrap();

        let token = create_token(&Claims::new(user.id), TEST_SECRET).unwrap();

        TestUser {
            user,
            cookie: format!("auth-token={}", token),
        }
    }

    /// Adds `user` to `project_id` with `role`
    pub async fn add_member(&self, user: &TestUser, project_id: Uuid, role: ProjectRole) {
        self.store
            .add_member(user.id(), project_id, role)
            .await
            .unwrap();
    }

    /// Sends a request through the full router
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        cookie: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let builder = Request::builder().method(method).uri(uri);
        let builder = match cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        };
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    /// Sends a prebuilt request through the full router
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().call(request).await.unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str, user: &TestUser) -> TestResponse {
        self.request(Method::GET, uri, Some(&user.cookie), None).await
    }

    pub async fn post(&self, uri: &str, user: &TestUser, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(&user.cookie), Some(body))
            .await
    }

    pub async fn put(&self, uri: &str, user: &TestUser, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(&user.cookie), Some(body))
            .await
    }

    pub async fn delete(&self, uri: &str, user: &TestUser) -> TestResponse {
        self.request(Method::DELETE, uri, Some(&user.cookie), None)
            .await
    }

    /// Creates a project through the API and returns its id
    pub async fn create_project(&self, user: &TestUser, name: &str) -> Uuid {
        let response = self
            .post("/projects", user, serde_json::json!({ "name": name }))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["project"]["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .unwrap()
    }

    /// Creates a task through the API and returns its id
    pub async fn create_task(&self, user: &TestUser, project_id: Uuid, title: &str) -> Uuid {
        let response = self
            .post(
                "/tasks",
                user,
                serde_json::json!({ "projectId": project_id, "title": title }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);

        response.body["task"]["id"]
            .as_str()
            .and_then(|id| Uuid::parse_str(id).ok())
            .unwrap()
    }
}
