// lib.rs - Fleet advisor chat service
pub mod config;
pub mod db;
pub mod error;
pub mod gemini_client;
pub mod generator;
pub mod handlers;
pub mod lookup;
pub mod middleware;
pub mod models;
pub mod prompt;
pub mod services;
pub mod views;

use axum::{Extension, Router};
use std::sync::Arc;

/// Shared by every request. Holds the pool, not a connection: each request
/// acquires its own connection and releases it when the handler returns.
pub struct AppState {
    pub db_pool: sqlx::SqlitePool,
    pub generator: Arc<dyn generator::ResponseGenerator>,
    pub prompt_builder: Arc<dyn prompt::PromptBuilder>,
    pub views: views::Views,
}

/// All routes, wrapped in request logging, with `state` attached.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(handlers::chat::chat_routes())
        .merge(handlers::history::history_routes())
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(Extension(state))
}
