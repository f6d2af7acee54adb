// src/handlers/history.rs
use crate::error::AppError;
use crate::prompt::format_transcript;
use crate::services::history;
use crate::AppState;
use axum::{
    extract::{Extension, Path},
    response::Html,
    routing::get,
    Router,
};
use std::sync::Arc;

pub fn history_routes() -> Router {
    Router::new().route("/history/:user_name", get(show_history))
}

/// Read-only transcript for one user. The name is a path segment, so there is
/// nothing to redirect on.
async fn show_history(
    Extension(state): Extension<Arc<AppState>>,
    Path(user_name): Path<String>,
) -> Result<Html<String>, AppError> {
    let mut conn = state.db_pool.acquire().await?;
    let turns = history::load(&mut conn, &user_name).await?;
    drop(conn);

    Ok(Html(state.views.history(&user_name, &format_transcript(&turns))?))
}
