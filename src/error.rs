// src/error.rs
use crate::gemini_client::GeminiError;
use axum::{
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use uuid::Uuid;

/// Failures that end a request. None of them are recovered from.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Generation error: {0}")]
    Generation(#[from] GeminiError),
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
    #[error("Invalid form submission: {0}")]
    Form(#[from] FormRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Form(rejection) => {
                tracing::warn!(error = %rejection, "rejected form submission");
                rejection.into_response()
            }
            err => internal_error(err),
        }
    }
}

fn internal_error(err: AppError) -> Response {
    let error_id = Uuid::new_v4();

    tracing::error!(
        error_id = %error_id,
        error = %err,
        "unhandled error occurred"
    );

    // In production, don't expose internal error details
    let message = if cfg!(debug_assertions) {
        format!("Internal server error: {} (ID: {})", err, error_id)
    } else {
        format!("Internal server error (ID: {})", error_id)
    };

    (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
}
