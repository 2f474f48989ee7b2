/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Session endpoints (register, login, logout, session)
/// - `projects`: Projects and their rosters
/// - `tasks`: Tasks on a project board
///
/// Handlers are thin: they extract the [`AuthContext`](taskboard_shared::auth::session::AuthContext)
/// put in place by the session middleware, call a service from
/// `taskboard_shared::services`, and shape the JSON response.

use serde::Serialize;

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;

/// Body of responses that only carry a message
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
