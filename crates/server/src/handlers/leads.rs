//! Lead management: filtered listing, inline status/price edits, deletes,
//! and the operator CSV export.

use crate::{
    errors::AppError,
    state::AppState,
    types::{LeadUpdateResponse, OkResponse},
};
use axum::{
    extract::{Path, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
    Json,
};
use buyback::{
    leads::{self, LEAD_STATUSES},
    tables, Record,
};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

/// The filters shared by the lead list and the export, mirroring the
/// admin UI's search controls.
#[derive(Deserialize, Default)]
pub struct LeadFilter {
    /// Free-text search over model, name, email, phone, city, and shop.
    pub q: Option<String>,
    /// Delivery method: `ship` or `dropoff`.
    pub method: Option<String>,
    /// Voucher preference: `yes` or `no` (no includes unset).
    pub voucher: Option<String>,
    /// Inclusive date bounds, `YYYY-MM-DD`.
    pub from: Option<String>,
    pub to: Option<String>,
    /// Export only: serve as an attachment when set.
    pub download: Option<String>,
}

/// Translates the filter into store query parameters. Repeated keys are
/// combined conjunctively by the store.
fn lead_query(filter: &LeadFilter, select: &str) -> Vec<(String, String)> {
    let mut query = vec![
        ("select".to_string(), select.to_string()),
        ("order".to_string(), "created_at.desc".to_string()),
    ];

    if let Some(q) = filter.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("*{q}*");
        let clauses = [
            "model", "first_name", "last_name", "email", "phone", "city", "shop_location",
        ]
        .iter()
        .map(|column| format!("{column}.ilike.{pattern}"))
        .collect::<Vec<_>>()
        .join(",");
        query.push(("or".to_string(), format!("({clauses})")));
    }

    match filter.method.as_deref() {
        Some("ship") => query.push(("delivery_method".to_string(), "eq.ship".to_string())),
        Some("dropoff") => query.push(("delivery_method".to_string(), "eq.dropoff".to_string())),
        _ => {}
    }

    match filter.voucher.as_deref() {
        Some("yes") => query.push(("wants_voucher".to_string(), "eq.true".to_string())),
        Some("no") => query.push((
            "or".to_string(),
            "(wants_voucher.is.null,wants_voucher.eq.false)".to_string(),
        )),
        _ => {}
    }

    if let Some(from) = filter.from.as_deref().filter(|d| !d.is_empty()) {
        query.push(("created_at".to_string(), format!("gte.{from}T00:00:00Z")));
    }
    if let Some(to) = filter.to.as_deref().filter(|d| !d.is_empty()) {
        query.push(("created_at".to_string(), format!("lte.{to}T23:59:59.999Z")));
    }

    query
}

/// Handler for `GET /admin/leads`.
pub async fn list_leads(
    State(app_state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> Result<Json<Vec<Record>>, AppError> {
    let rows = app_state
        .store
        .select(tables::LEADS, &lead_query(&filter, "*"))
        .await?;
    Ok(Json(rows))
}

/// Body of the inline lead edit: both fields optional, but at least one
/// must carry a value.
#[derive(Deserialize)]
pub struct LeadPatch {
    pub status: Option<String>,
    /// Operator-entered euro amount, e.g. `"12,50"`.
    pub final_price_eur: Option<String>,
}

/// Handler for `PATCH /admin/leads/{id}`.
pub async fn update_lead(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<LeadPatch>,
) -> Result<Json<LeadUpdateResponse>, AppError> {
    if !leads::is_uuid(&id) {
        return Err(AppError::BadRequest(format!("invalid lead id: {id}")));
    }

    let mut changes = Record::new();

    if let Some(status) = patch.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        if !LEAD_STATUSES.contains(&status) {
            return Err(AppError::BadRequest(format!("invalid status: {status}")));
        }
        changes.insert("status".to_string(), Value::from(status));
    }

    if let Some(price) = patch.final_price_eur.as_deref() {
        match leads::parse_price_to_cents(price) {
            Some(cents) => {
                changes.insert("final_price_cents".to_string(), Value::from(cents));
            }
            None if !price.trim().is_empty() => {
                return Err(AppError::BadRequest(format!("invalid price: {price}")));
            }
            None => {}
        }
    }

    if changes.is_empty() {
        return Err(AppError::BadRequest("no changes submitted".to_string()));
    }
    changes.insert(
        "updated_at".to_string(),
        Value::from(chrono::Utc::now().to_rfc3339()),
    );

    let updated = app_state
        .store
        .update(
            tables::LEADS,
            &[("id".to_string(), format!("eq.{id}"))],
            &changes,
        )
        .await?;

    let lead = updated
        .into_iter()
        .next()
        .map(Value::Object)
        .ok_or_else(|| AppError::NotFound(format!("lead not found: {id}")))?;

    info!(lead_id = %id, "Lead updated");
    Ok(Json(LeadUpdateResponse { ok: true, lead }))
}

/// Handler for `GET /admin/leads/{id}/events`: the status/audit history
/// of one lead, newest first.
pub async fn list_lead_events(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Record>>, AppError> {
    if !leads::is_uuid(&id) {
        return Err(AppError::BadRequest(format!("invalid lead id: {id}")));
    }
    let rows = app_state
        .store
        .select(
            tables::LEAD_EVENTS,
            &[
                ("select".to_string(), "*".to_string()),
                ("lead_id".to_string(), format!("eq.{id}")),
                ("order".to_string(), "created_at.desc".to_string()),
            ],
        )
        .await?;
    Ok(Json(rows))
}

/// Handler for `DELETE /admin/leads/{id}`.
pub async fn delete_lead(
    State(app_state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<OkResponse>, AppError> {
    if !leads::is_uuid(&id) {
        return Err(AppError::BadRequest(format!("invalid lead id: {id}")));
    }
    app_state
        .store
        .delete(tables::LEADS, &[("id".to_string(), format!("eq.{id}"))])
        .await?;
    Ok(Json(OkResponse::ok()))
}

/// Handler for `GET /admin/leads/export`: the filtered leads as CSV, with
/// money columns in euros and the IBAN masked.
pub async fn export_leads(
    State(app_state): State<AppState>,
    Query(filter): Query<LeadFilter>,
) -> Result<Response, AppError> {
    let rows = app_state
        .store
        .select(tables::LEADS, &lead_query(&filter, leads::EXPORT_SELECT))
        .await?;

    let csv = leads::export_csv(&rows).map_err(|err| AppError::Internal(err.into()))?;
    info!(rows = rows.len(), "Exported leads CSV");

    let mut response = ([(CONTENT_TYPE, "text/csv; charset=utf-8")], csv).into_response();
    if filter.download.is_some() {
        response.headers_mut().insert(
            CONTENT_DISPOSITION,
            "attachment; filename=\"buyback-leads.csv\""
                .parse()
                .map_err(|_| AppError::Internal(anyhow::anyhow!("invalid header value")))?,
        );
    }
    Ok(response)
}
