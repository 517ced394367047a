//! Catalog CRUD pass-throughs for the `buyback_catalog` table.

use crate::{errors::AppError, state::AppState, types::OkResponse};
use axum::{extract::State, Json};
use buyback::{
    tables,
    types::{to_record, CatalogKey, CatalogRow},
    Record,
};

const ON_CONFLICT: &str = "brand,model,variant,capacity_gb";

/// Handler for `GET /admin/catalog`: the full catalog, stably ordered.
pub async fn list_catalog(
    State(app_state): State<AppState>,
) -> Result<Json<Vec<Record>>, AppError> {
    let rows = app_state
        .store
        .select(
            tables::CATALOG,
            &[
                ("select".to_string(), "*".to_string()),
                (
                    "order".to_string(),
                    "brand.asc,model.asc,capacity_gb.asc".to_string(),
                ),
            ],
        )
        .await?;
    Ok(Json(rows))
}

/// Handler for `POST /admin/catalog`: upsert one catalog row.
pub async fn upsert_catalog(
    State(app_state): State<AppState>,
    Json(row): Json<CatalogRow>,
) -> Result<Json<OkResponse>, AppError> {
    row.validate().map_err(AppError::BadRequest)?;
    app_state
        .store
        .upsert(tables::CATALOG, &[to_record(&row)], ON_CONFLICT)
        .await?;
    Ok(Json(OkResponse::ok()))
}

/// Handler for `DELETE /admin/catalog`: delete by natural key.
pub async fn delete_catalog(
    State(app_state): State<AppState>,
    Json(key): Json<CatalogKey>,
) -> Result<Json<OkResponse>, AppError> {
    let variant_filter = match &key.variant {
        Some(variant) => format!("eq.{variant}"),
        None => "is.null".to_string(),
    };
    app_state
        .store
        .delete(
            tables::CATALOG,
            &[
                ("brand".to_string(), format!("eq.{}", key.brand)),
                ("model".to_string(), format!("eq.{}", key.model)),
                ("variant".to_string(), variant_filter),
                ("capacity_gb".to_string(), format!("eq.{}", key.capacity_gb)),
            ],
        )
        .await?;
    Ok(Json(OkResponse::ok()))
}
