//! Multiplier-rule CRUD pass-throughs for `buyback_multipliers_norm`.

use crate::{errors::AppError, state::AppState, types::OkResponse};
use axum::{
    extract::{Query, State},
    Json,
};
use buyback::{
    tables,
    types::{to_record, MultiplierKey, MultiplierRow},
    Record,
};
use serde::Deserialize;

const ON_CONFLICT: &str = "model,question_key,option_key";

#[derive(Deserialize, Default)]
pub struct MultiplierParams {
    pub model: Option<String>,
}

/// Handler for `GET /admin/multipliers`: rules, optionally for one model,
/// grouped by question and ordered by priority.
pub async fn list_multipliers(
    State(app_state): State<AppState>,
    Query(params): Query<MultiplierParams>,
) -> Result<Json<Vec<Record>>, AppError> {
    let mut query = vec![
        ("select".to_string(), "*".to_string()),
        (
            "order".to_string(),
            "question_key.asc,priority.asc,option_key.asc".to_string(),
        ),
    ];
    if let Some(model) = params.model.filter(|m| !m.is_empty()) {
        query.push(("model".to_string(), format!("eq.{model}")));
    }

    let rows = app_state.store.select(tables::MULTIPLIERS, &query).await?;
    Ok(Json(rows))
}

/// Handler for `POST /admin/multipliers`: upsert one rule, filling the
/// active/priority defaults the admin UI relies on.
pub async fn upsert_multiplier(
    State(app_state): State<AppState>,
    Json(row): Json<MultiplierRow>,
) -> Result<Json<OkResponse>, AppError> {
    row.validate().map_err(AppError::BadRequest)?;
    let row = row.with_defaults();
    app_state
        .store
        .upsert(tables::MULTIPLIERS, &[to_record(&row)], ON_CONFLICT)
        .await?;
    Ok(Json(OkResponse::ok()))
}

/// Handler for `DELETE /admin/multipliers`: delete by natural key.
pub async fn delete_multiplier(
    State(app_state): State<AppState>,
    Json(key): Json<MultiplierKey>,
) -> Result<Json<OkResponse>, AppError> {
    app_state
        .store
        .delete(
            tables::MULTIPLIERS,
            &[
                ("model".to_string(), format!("eq.{}", key.model)),
                ("question_key".to_string(), format!("eq.{}", key.question_key)),
                ("option_key".to_string(), format!("eq.{}", key.option_key)),
            ],
        )
        .await?;
    Ok(Json(OkResponse::ok()))
}
