//! # Import Pipeline Integration Tests
//!
//! End-to-end runs of the staged import against a scripted mock store,
//! covering the success path and every partial-failure state the staging
//! table can be left in.

use anyhow::Result;
use buyback::{ImportError, ImportKind, ImportRequest, Importer};
use buyback_test_utils::{MockTableStore, StoreCall};
use std::sync::Arc;

fn importer(store: &MockTableStore) -> Importer {
    Importer::new(Arc::new(store.clone()))
}

fn price_request(csv: &str) -> ImportRequest {
    ImportRequest {
        kind: ImportKind::Prices,
        csv: csv.to_string(),
    }
}

/// Builds a price CSV with `rows` data lines.
fn price_csv(rows: usize) -> String {
    let mut csv = String::from("brand;model;storage_gb;base_price\n");
    for i in 0..rows {
        csv.push_str(&format!("Apple;iPhone {i};128GB;450\n"));
    }
    csv
}

#[tokio::test]
async fn semicolon_price_upload_is_staged_and_transformed() -> Result<()> {
    let store = MockTableStore::new();
    let summary = importer(&store).run(&price_request(&price_csv(3))).await?;

    assert_eq!(summary.count, 3);
    assert_eq!(store.staged_row_count(), 3);
    for row in store.staged_rows() {
        assert_eq!(row["storage_gb"], 128, "storage_gb must be coerced to an integer");
        assert_eq!(row["brand"], "Apple");
    }

    // delete, one insert batch, then the transform procedure, in order
    let calls = store.calls();
    assert!(matches!(
        &calls[0],
        StoreCall::Delete { table, .. } if table == "buyback_prices_landing"
    ));
    assert!(matches!(
        &calls[1],
        StoreCall::Insert { table, count: 3 } if table == "buyback_prices_landing"
    ));
    assert!(matches!(
        &calls[2],
        StoreCall::Rpc { function } if function == "import_buyback_prices"
    ));
    assert_eq!(calls.len(), 3);
    Ok(())
}

#[tokio::test]
async fn aliased_headers_and_quoted_cells_are_normalized() -> Result<()> {
    let store = MockTableStore::new();
    let csv = "Brand;Model;Capacity (GB);Prijs\nApple;\"iPhone 12; Pro\";256GB;520\n";
    let summary = importer(&store).run(&price_request(csv)).await?;

    assert_eq!(summary.count, 1);
    let row = &store.staged_rows()[0];
    assert_eq!(row["model"], "iPhone 12; Pro");
    assert_eq!(row["storage_gb"], 256);
    assert_eq!(row["base_price"], "520");
    Ok(())
}

#[tokio::test]
async fn missing_required_column_stops_before_any_store_call() {
    let store = MockTableStore::new();
    let csv = "brand;model;storage_gb\nApple;iPhone 12;128\n";
    let err = importer(&store)
        .run(&price_request(csv))
        .await
        .unwrap_err();

    match &err {
        ImportError::MissingColumns { missing, detected, .. } => {
            assert_eq!(missing, &["base_price".to_string()]);
            assert_eq!(detected.len(), 3);
        }
        other => panic!("expected MissingColumns, got {other:?}"),
    }
    assert!(err.to_string().contains("base_price"));
    assert!(store.calls().is_empty(), "no store call may precede validation");
}

#[tokio::test]
async fn empty_and_undersized_payloads_are_rejected_early() {
    let store = MockTableStore::new();
    let importer = importer(&store);

    let err = importer
        .run(&price_request("ab"))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::InvalidRequest(_)));

    let err = importer
        .run(&price_request("brand;model;storage_gb;base_price\n"))
        .await
        .unwrap_err();
    assert!(matches!(err, ImportError::EmptyInput));

    assert!(store.calls().is_empty());
}

#[tokio::test]
async fn failing_second_batch_aborts_with_the_batch_head_as_example() {
    let store = MockTableStore::new();
    store.fail_insert_call(1);

    let err = importer(&store)
        .run(&price_request(&price_csv(1000)))
        .await
        .unwrap_err();

    match err {
        ImportError::StagingInsert { offset, example, .. } => {
            assert_eq!(offset, 500);
            // the first record of the failing batch, 0-indexed record #500
            assert_eq!(example["model"], "iPhone 500");
        }
        other => panic!("expected StagingInsert, got {other:?}"),
    }

    // first batch landed, second did not, and no later batch was attempted
    assert_eq!(store.staged_row_count(), 500);
    let inserts = store
        .calls()
        .iter()
        .filter(|call| matches!(call, StoreCall::Insert { .. }))
        .count();
    assert_eq!(inserts, 2);
    assert!(!store
        .calls()
        .iter()
        .any(|call| matches!(call, StoreCall::Rpc { .. })));
}

#[tokio::test]
async fn failing_delete_leaves_staging_untouched() {
    let store = MockTableStore::new();
    store.fail_delete();

    let err = importer(&store)
        .run(&price_request(&price_csv(3)))
        .await
        .unwrap_err();

    assert!(matches!(err, ImportError::StagingDelete { .. }));
    assert!(!store
        .calls()
        .iter()
        .any(|call| matches!(call, StoreCall::Insert { .. })));
}

#[tokio::test]
async fn failing_procedure_reports_distinctly_and_keeps_staging_populated() {
    let store = MockTableStore::new();
    store.fail_rpc();

    let err = importer(&store)
        .run(&price_request(&price_csv(3)))
        .await
        .unwrap_err();

    match &err {
        ImportError::TransformProcedure { procedure, .. } => {
            assert_eq!(procedure, "import_buyback_prices");
        }
        other => panic!("expected TransformProcedure, got {other:?}"),
    }
    // the loud remedy hint for operators
    assert!(err.to_string().contains("re-run the procedure"));
    assert_eq!(store.staged_row_count(), 3);
}

#[tokio::test]
async fn multiplier_upload_targets_its_own_staging_and_procedure() -> Result<()> {
    let store = MockTableStore::new();
    let csv = "model,functional_title,functional_ja_value,ship_opzenden_tip,ignored\n\
               iPhone 12,Does it work?,1.0,Use padded envelope,x\n";
    let summary = importer(&store)
        .run(&ImportRequest {
            kind: ImportKind::Multipliers,
            csv: csv.to_string(),
        })
        .await?;

    assert_eq!(summary.count, 1);
    let row = &store.staged_rows()[0];
    assert_eq!(row["model"], "iPhone 12");
    assert_eq!(row["functional_ja_value"], "1.0");
    assert!(!row.contains_key("ignored"));

    assert!(store.calls().iter().any(|call| matches!(
        call,
        StoreCall::Rpc { function } if function == "import_buyback_multipliers"
    )));
    assert!(store.calls().iter().any(|call| matches!(
        call,
        StoreCall::Delete { table, .. } if table == "buyback_multipliers_landing"
    )));
    Ok(())
}
