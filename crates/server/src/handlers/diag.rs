//! Operational self-check: confirms the store credentials are present and
//! the database answers, and reports the most recent lead as a liveness hint.

use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use buyback::tables;
use serde_json::{json, Value};
use tracing::error;

/// Handler for `GET /admin/diag`.
///
/// Probes `buyback_leads` with a one-row select. A reachable database
/// yields `{ ok: true, db: "ok", last }`; any store failure is reported
/// as a 500 with the underlying message so the operator can tell
/// credentials from connectivity problems.
pub async fn diag_handler(State(app_state): State<AppState>) -> Response {
    let has_url = !app_state.config.store.url.is_empty();
    let has_service_key = !app_state.config.store.service_role_key.is_empty();

    let probe = app_state
        .store
        .select(
            tables::LEADS,
            &[
                ("select".to_string(), "id,created_at".to_string()),
                ("order".to_string(), "created_at.desc".to_string()),
                ("limit".to_string(), "1".to_string()),
            ],
        )
        .await;

    match probe {
        Ok(rows) => {
            let last = rows.into_iter().next().map(Value::Object);
            Json(json!({
                "ok": true,
                "has_url": has_url,
                "has_service_key": has_service_key,
                "db": "ok",
                "last": last,
            }))
            .into_response()
        }
        Err(err) => {
            error!("Diagnostics probe failed: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "ok": false,
                    "has_url": has_url,
                    "has_service_key": has_service_key,
                    "db": "fail",
                    "error": err.to_string(),
                })),
            )
                .into_response()
        }
    }
}
