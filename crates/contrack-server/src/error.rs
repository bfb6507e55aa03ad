use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use contrack_engine::{TrackerError, UnknownJob};
use serde_json::json;
use thiserror::Error;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// A failed tracker invocation with the alerts it raised before failing
    #[error("Tracker error: {error}")]
    Tracker { error: TrackerError, alerts: Vec<String> },
}

fn tracker_status(e: &TrackerError) -> StatusCode {
    match e {
        TrackerError::MissingSheet(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TrackerError::InvalidEntry { .. } => StatusCode::BAD_REQUEST,
        TrackerError::Store(_) => {
            tracing::warn!("Tracker storage error: {}", e);
            StatusCode::BAD_REQUEST
        }
    }
}

impl From<UnknownJob> for AppError {
    fn from(err: UnknownJob) -> Self {
        AppError::NotFound(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::Internal(format!("tracker task failed: {}", err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::Tracker { error, alerts } => {
                let body = Json(json!({
                    "error": error.to_string(),
                    "alerts": alerts,
                }));
                return (tracker_status(error), body).into_response();
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
