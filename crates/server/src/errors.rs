//! # Server Error Type
//!
//! Every handler failure converges here and is rendered as the structured
//! `{ ok: false, error, details? }` body the admin UI displays verbatim.
//! Nothing escapes a handler as an unhandled panic.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use buyback::{ImportError, StoreError};
use serde_json::json;
use tracing::error;

pub enum AppError {
    /// The request itself was malformed (bad key, bad id, bad status).
    BadRequest(String),
    /// The referenced row does not exist.
    NotFound(String),
    /// A failure from the import pipeline, carrying its own diagnostics.
    Import(ImportError),
    /// A store operation outside the import pipeline failed.
    Store(StoreError),
    /// Generic internal server errors.
    Internal(anyhow::Error),
}

impl From<ImportError> for AppError {
    fn from(err: ImportError) -> Self {
        AppError::Import(err)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Store(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status_code, error_message, details) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            AppError::Import(err) => {
                error!("Import failed: {err}");
                let status = match err {
                    ImportError::InvalidRequest(_)
                    | ImportError::EmptyInput
                    | ImportError::Parse { .. }
                    | ImportError::MissingColumns { .. } => StatusCode::BAD_REQUEST,
                    // failures on the store side of the pipeline
                    ImportError::StagingDelete { .. }
                    | ImportError::StagingInsert { .. }
                    | ImportError::TransformProcedure { .. } => StatusCode::BAD_GATEWAY,
                };
                let details = err.details();
                (status, err.to_string(), details)
            }
            AppError::Store(err) => {
                error!("Store operation failed: {err}");
                (StatusCode::BAD_GATEWAY, err.to_string(), None)
            }
            AppError::Internal(err) => {
                error!("Internal server error: {err:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred.".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "ok": false,
            "error": error_message,
        });
        if let (Some(details), Some(map)) = (details, body.as_object_mut()) {
            map.insert("details".to_string(), details);
        }

        (status_code, Json(body)).into_response()
    }
}
