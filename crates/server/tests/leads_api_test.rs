//! Integration tests for the lead list, inline edits, deletes, and the
//! CSV export endpoint.

mod common;

use anyhow::Result;
use buyback_test_utils::StoreCall;
use common::TestApp;
use serde_json::{json, Value};

const LEAD_ID: &str = "9b2c6d1e-3f4a-4b5c-8d6e-7f8091a2b3c4";

#[tokio::test]
async fn test_lead_list_hits_the_leads_table() -> Result<()> {
    let app = TestApp::spawn().await;
    let lead = json!({"id": LEAD_ID, "model": "iPhone 12", "status": "new"});
    app.store
        .set_select_rows(vec![lead.as_object().unwrap().clone()]);

    let response = app
        .client
        .get(app.url("/admin/leads?q=iphone&method=ship&voucher=no"))
        .send()
        .await?;

    assert!(response.status().is_success());
    let rows: Vec<Value> = response.json().await?;
    assert_eq!(rows[0]["status"], json!("new"));
    assert!(matches!(
        &app.store.calls()[0],
        StoreCall::Select { table } if table == "buyback_leads"
    ));

    Ok(())
}

#[tokio::test]
async fn test_lead_patch_updates_status_and_price() -> Result<()> {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .patch(app.url(&format!("/admin/leads/{LEAD_ID}")))
        .json(&json!({"status": "done", "final_price_eur": "123,45"}))
        .send()
        .await?;

    assert!(response.status().is_success());
    let body: Value = response.json().await?;
    assert_eq!(body["ok"], json!(true));
    assert_eq!(body["lead"]["status"], json!("done"));
    assert_eq!(body["lead"]["final_price_cents"], json!(12345));
    assert!(body["lead"]["updated_at"].is_string());

    let calls = app.store.calls();
    let StoreCall::Update { table, filters } = &calls[0] else {
        panic!("expected an update call");
    };
    assert_eq!(table, "buyback_leads");
    assert_eq!(filters, &[("id".to_string(), format!("eq.{LEAD_ID}"))]);

    Ok(())
}

#[tokio::test]
async fn test_lead_patch_rejects_bad_input() -> Result<()> {
    let app = TestApp::spawn().await;

    // Malformed id.
    let response = app
        .client
        .patch(app.url("/admin/leads/not-a-uuid"))
        .json(&json!({"status": "done"}))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    // Unknown status.
    let response = app
        .client
        .patch(app.url(&format!("/admin/leads/{LEAD_ID}")))
        .json(&json!({"status": "lost"}))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    // Unparseable price.
    let response = app
        .client
        .patch(app.url(&format!("/admin/leads/{LEAD_ID}")))
        .json(&json!({"final_price_eur": "abc"}))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    // Nothing to change.
    let response = app
        .client
        .patch(app.url(&format!("/admin/leads/{LEAD_ID}")))
        .json(&json!({}))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);

    assert!(app.store.calls().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_lead_delete_requires_a_uuid() -> Result<()> {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .delete(app.url("/admin/leads/1;drop"))
        .send()
        .await?;
    assert_eq!(response.status().as_u16(), 400);
    assert!(app.store.calls().is_empty());

    let response = app
        .client
        .delete(app.url(&format!("/admin/leads/{LEAD_ID}")))
        .send()
        .await?;
    assert!(response.status().is_success());

    let calls = app.store.calls();
    let StoreCall::Delete { table, filters } = &calls[0] else {
        panic!("expected a delete call");
    };
    assert_eq!(table, "buyback_leads");
    assert_eq!(filters, &[("id".to_string(), format!("eq.{LEAD_ID}"))]);

    Ok(())
}

#[tokio::test]
async fn test_lead_events_are_listed_for_a_lead() -> Result<()> {
    let app = TestApp::spawn().await;
    let event = json!({
        "lead_id": LEAD_ID,
        "event": "status_changed",
        "created_at": "2026-08-01T10:00:00Z"
    });
    app.store
        .set_select_rows(vec![event.as_object().unwrap().clone()]);

    let response = app
        .client
        .get(app.url(&format!("/admin/leads/{LEAD_ID}/events")))
        .send()
        .await?;

    assert!(response.status().is_success());
    let rows: Vec<Value> = response.json().await?;
    assert_eq!(rows[0]["event"], json!("status_changed"));
    assert!(matches!(
        &app.store.calls()[0],
        StoreCall::Select { table } if table == "buyback_lead_events"
    ));

    Ok(())
}

#[tokio::test]
async fn test_lead_events_require_a_uuid() -> Result<()> {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/admin/leads/not-a-uuid/events"))
        .send()
        .await?;

    assert_eq!(response.status().as_u16(), 400);
    assert!(app.store.calls().is_empty());

    Ok(())
}

#[tokio::test]
async fn test_lead_export_masks_ibans_and_serves_csv() -> Result<()> {
    let app = TestApp::spawn().await;
    let lead = json!({
        "created_at": "2026-01-05T10:00:00Z",
        "model": "iPhone 12",
        "capacity_gb": 128,
        "base_price_cents": 45_000,
        "wants_voucher": false,
        "iban": "BE71 0961 2345 6769",
        "id": LEAD_ID
    });
    app.store
        .set_select_rows(vec![lead.as_object().unwrap().clone()]);

    let response = app
        .client
        .get(app.url("/admin/leads/export"))
        .send()
        .await?;

    assert!(response.status().is_success());
    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/csv"));
    assert!(response.headers().get("content-disposition").is_none());

    let body = response.text().await?;
    assert!(body.starts_with("created_at,source,model"));
    assert!(body.contains("BE71************6769"));
    assert!(!body.contains("0961 2345"));

    Ok(())
}

#[tokio::test]
async fn test_lead_export_handles_multibyte_account_values() -> Result<()> {
    let app = TestApp::spawn().await;
    let lead = json!({
        "created_at": "2026-01-05T10:00:00Z",
        "model": "iPhone 12",
        "iban": "€€71 0961 2345 6769",
        "id": LEAD_ID
    });
    app.store
        .set_select_rows(vec![lead.as_object().unwrap().clone()]);

    let response = app
        .client
        .get(app.url("/admin/leads/export"))
        .send()
        .await?;

    assert!(response.status().is_success());
    let body = response.text().await?;
    assert!(body.contains("€€71************6769"));

    Ok(())
}

#[tokio::test]
async fn test_lead_export_download_sets_attachment_header() -> Result<()> {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/admin/leads/export?download=1"))
        .send()
        .await?;

    assert!(response.status().is_success());
    let disposition = response
        .headers()
        .get("content-disposition")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    assert!(disposition.contains("attachment"));
    assert!(disposition.contains("buyback-leads.csv"));

    Ok(())
}

#[tokio::test]
async fn test_lead_export_propagates_store_failures() -> Result<()> {
    let app = TestApp::spawn().await;
    app.store.fail_select();

    let response = app
        .client
        .get(app.url("/admin/leads/export"))
        .send()
        .await?;

    assert_eq!(response.status().as_u16(), 502);
    let body: Value = response.json().await?;
    assert_eq!(body["ok"], json!(false));

    Ok(())
}
