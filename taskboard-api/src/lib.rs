//! # TaskBoard API Server Library
//!
//! HTTP layer of the TaskBoard backend: configuration, error mapping, the axum
//! router and its middleware, and the route handlers. Everything below the
//! handlers (storage, authorization, project and task rules) lives in
//! `taskboard_shared`.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `extract`: JSON body and path id extractors
//! - `middleware`: Security headers
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
