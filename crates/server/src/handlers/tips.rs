//! UI-tip CRUD pass-throughs for `buyback_ui_tips`.

use crate::{errors::AppError, state::AppState, types::OkResponse};
use axum::{
    extract::{Query, State},
    Json,
};
use buyback::{
    tables,
    types::{to_record, TipKey, TipRow},
    Record,
};
use serde::Deserialize;

const ON_CONFLICT: &str = "model,tip_key";

#[derive(Deserialize, Default)]
pub struct TipParams {
    pub model: Option<String>,
}

/// Handler for `GET /admin/tips`.
pub async fn list_tips(
    State(app_state): State<AppState>,
    Query(params): Query<TipParams>,
) -> Result<Json<Vec<Record>>, AppError> {
    let mut query = vec![
        ("select".to_string(), "*".to_string()),
        ("order".to_string(), "model.asc,tip_key.asc".to_string()),
    ];
    if let Some(model) = params.model.filter(|m| !m.is_empty()) {
        query.push(("model".to_string(), format!("eq.{model}")));
    }

    let rows = app_state.store.select(tables::TIPS, &query).await?;
    Ok(Json(rows))
}

/// Handler for `POST /admin/tips`: upsert one tip.
pub async fn upsert_tip(
    State(app_state): State<AppState>,
    Json(row): Json<TipRow>,
) -> Result<Json<OkResponse>, AppError> {
    row.validate().map_err(AppError::BadRequest)?;
    app_state
        .store
        .upsert(tables::TIPS, &[to_record(&row)], ON_CONFLICT)
        .await?;
    Ok(Json(OkResponse::ok()))
}

/// Handler for `DELETE /admin/tips`: delete by (model, tip_key).
pub async fn delete_tip(
    State(app_state): State<AppState>,
    Json(key): Json<TipKey>,
) -> Result<Json<OkResponse>, AppError> {
    app_state
        .store
        .delete(
            tables::TIPS,
            &[
                ("model".to_string(), format!("eq.{}", key.model)),
                ("tip_key".to_string(), format!("eq.{}", key.tip_key)),
            ],
        )
        .await?;
    Ok(Json(OkResponse::ok()))
}
