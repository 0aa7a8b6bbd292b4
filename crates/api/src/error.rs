use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pagesmith_ai::AiError;
use pagesmith_core::error::CoreError;
use pagesmith_db::StoreError;
use pagesmith_pipeline::{PipelineError, SubmitError};
use serde_json::{json, Value};

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for persistence
/// failures. Implements [`IntoResponse`] to produce consistent
/// `{ "error", "code" }` JSON bodies.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message (body could not be read).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The pipeline could not take the project.
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Core(e) => AppError::Core(e),
            PipelineError::Store(e) => AppError::Store(e),
            PipelineError::Submit(e) => AppError::Submit(e),
        }
    }
}

impl From<AiError> for AppError {
    fn from(err: AiError) -> Self {
        AppError::Core(err.into())
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details: Option<Value> = None;

        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::InvalidRequest { message, fields } => {
                    if !fields.is_empty() {
                        details = Some(json!(fields));
                    }
                    (StatusCode::BAD_REQUEST, "INVALID_REQUEST", message.clone())
                }
                CoreError::InvalidPath { .. } => {
                    (StatusCode::BAD_REQUEST, "INVALID_PATH", core.to_string())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::ExtractionFailed(msg) => {
                    tracing::warn!(error = %msg, "Brand extraction failed");
                    (StatusCode::BAD_GATEWAY, "EXTRACTION_FAILED", core.to_string())
                }
                CoreError::RewriteFailed(msg) => {
                    tracing::warn!(error = %msg, "Rewrite failed");
                    (StatusCode::BAD_GATEWAY, "REWRITE_FAILED", core.to_string())
                }
                CoreError::InvalidTransition { .. } | CoreError::Internal(_) => {
                    tracing::error!(error = %core, "Internal core error");
                    internal()
                }
            },

            AppError::Store(store) => match store {
                StoreError::Database(err) => classify_sqlx_error(err),
                StoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                StoreError::Corrupt(msg) => {
                    tracing::error!(error = %msg, "Corrupt row in store");
                    internal()
                }
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),

            AppError::Submit(SubmitError::ShuttingDown) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SHUTTING_DOWN",
                "Server is shutting down, try again shortly".to_string(),
            ),
            AppError::Submit(err) => {
                tracing::error!(error = %err, "Pipeline submission failed");
                internal()
            }

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let mut body = json!({
            "error": message,
            "code": code,
        });
        if let Some(details) = details {
            body["details"] = details;
        }

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}
