//! # CSV Import Handler
//!
//! The HTTP face of the import pipeline: one call carries the whole file
//! plus the kind selector, and the response is either the staged row count
//! or the pipeline's structured failure.

use crate::{errors::AppError, state::AppState, types::ImportResponse};
use axum::{extract::State, Json};
use buyback::ImportRequest;
use tracing::info;

/// Handler for `POST /admin/import`.
///
/// Parses, validates, and stages the uploaded CSV, then triggers the
/// kind's transform procedure. The request body is
/// `{ "type": "prices" | "multipliers", "csv": "<file contents>" }`.
pub async fn import_csv_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, AppError> {
    info!(
        kind = payload.kind.as_str(),
        bytes = payload.csv.len(),
        "Received import upload"
    );

    let summary = app_state.importer.run(&payload).await?;

    Ok(Json(ImportResponse {
        ok: true,
        count: summary.count,
    }))
}
