//! # CSV Import Pipeline
//!
//! Turns an uploaded delimited file into staged rows and triggers the
//! server-side transform that materializes them into production tables.
//!
//! The pipeline runs in strict stages: parse, normalize the header,
//! validate required columns, build sanitized records, then replace the
//! staging table (delete, ordered batched inserts) and invoke the kind's
//! transform procedure. All validation happens before the first store
//! call, so a rejected file never touches the staging table.

pub mod csv;
pub mod fields;
pub mod normalize;
pub mod sanitize;

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::errors::ImportError;
use crate::store::TableStore;

/// Rows per staging insert batch.
pub const CHUNK_SIZE: usize = 500;

/// Minimum upload size; anything shorter cannot hold a header and a row.
pub const MIN_CSV_LEN: usize = 5;

/// The import category. Selects the staging table, allow-list, required
/// columns, and transform procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    Prices,
    Multipliers,
}

impl ImportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Prices => "prices",
            ImportKind::Multipliers => "multipliers",
        }
    }

    /// The landing table fully replaced on each import.
    pub fn staging_table(&self) -> &'static str {
        match self {
            ImportKind::Prices => "buyback_prices_landing",
            ImportKind::Multipliers => "buyback_multipliers_landing",
        }
    }

    /// The stored procedure that reads the staging table and upserts into
    /// production tables.
    pub fn procedure(&self) -> &'static str {
        match self {
            ImportKind::Prices => "import_buyback_prices",
            ImportKind::Multipliers => "import_buyback_multipliers",
        }
    }

    /// Canonical columns that must be present after normalization.
    pub fn required_columns(&self) -> &'static [&'static str] {
        match self {
            ImportKind::Prices => fields::PRICE_REQUIRED,
            ImportKind::Multipliers => fields::MULTIPLIER_REQUIRED,
        }
    }
}

/// One upload: the kind selector plus the raw file contents.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    #[serde(rename = "type")]
    pub kind: ImportKind,
    pub csv: String,
}

/// Successful outcome: how many records landed in staging.
#[derive(Debug, Clone, Serialize)]
pub struct ImportSummary {
    pub count: usize,
}

/// Fails with `MissingColumns` when a required canonical column is absent
/// from the normalized header. Must run before anything touches the store.
fn check_required_columns(
    kind: ImportKind,
    canonical_header: &[String],
    raw_header: &[String],
    delimiter: char,
) -> Result<(), ImportError> {
    let missing: Vec<String> = kind
        .required_columns()
        .iter()
        .filter(|required| !canonical_header.iter().any(|column| column == *required))
        .map(|required| required.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ImportError::MissingColumns {
            missing,
            detected: raw_header.to_vec(),
            delimiter,
        })
    }
}

/// Runs the import pipeline against a [`TableStore`].
///
/// Holds one async mutex per import kind so two concurrent imports of the
/// same kind cannot interleave their delete/insert sequences on the shared
/// staging table. Imports of different kinds may run concurrently since
/// they touch disjoint tables.
#[derive(Debug, Clone)]
pub struct Importer {
    store: Arc<dyn TableStore>,
    price_lock: Arc<Mutex<()>>,
    multiplier_lock: Arc<Mutex<()>>,
}

impl Importer {
    pub fn new(store: Arc<dyn TableStore>) -> Self {
        Self {
            store,
            price_lock: Arc::new(Mutex::new(())),
            multiplier_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock_for(&self, kind: ImportKind) -> &Mutex<()> {
        match kind {
            ImportKind::Prices => &self.price_lock,
            ImportKind::Multipliers => &self.multiplier_lock,
        }
    }

    /// Runs one import to completion and returns the staged record count.
    ///
    /// Every failure is terminal for this call; there is no retry and no
    /// rollback of a partially populated staging table. The operator
    /// re-uploads after fixing the file, or re-runs the procedure when the
    /// error says staging itself succeeded.
    pub async fn run(&self, request: &ImportRequest) -> Result<ImportSummary, ImportError> {
        if request.csv.len() < MIN_CSV_LEN {
            return Err(ImportError::InvalidRequest(format!(
                "csv payload must be at least {MIN_CSV_LEN} characters"
            )));
        }

        // --- 1. Parse, normalize, and validate (no store calls yet) ---
        let parsed = csv::parse_table(&request.csv)?;
        let canonical = normalize::normalize_header(&parsed.header);
        check_required_columns(request.kind, &canonical, &parsed.header, parsed.delimiter)?;
        let records = sanitize::build_records(request.kind, &canonical, &parsed.rows);

        info!(
            kind = request.kind.as_str(),
            delimiter = %parsed.delimiter,
            records = records.len(),
            "Starting staged import"
        );

        let _guard = self.lock_for(request.kind).lock().await;
        let table = request.kind.staging_table();

        // --- 2. Replace the staging table contents ---
        self.store
            .delete(table, &[("model".to_string(), "neq.".to_string())])
            .await
            .map_err(|err| ImportError::StagingDelete {
                table: table.to_string(),
                message: err.to_string(),
            })?;

        for (batch_index, batch) in records.chunks(CHUNK_SIZE).enumerate() {
            let offset = batch_index * CHUNK_SIZE;
            if let Err(err) = self.store.insert(table, batch).await {
                warn!(table, offset, "Staging insert failed, aborting import");
                return Err(ImportError::StagingInsert {
                    table: table.to_string(),
                    offset,
                    message: err.to_string(),
                    example: batch
                        .first()
                        .cloned()
                        .map(serde_json::Value::Object)
                        .unwrap_or(serde_json::Value::Null),
                });
            }
        }

        // --- 3. Materialize staging into production tables ---
        let procedure = request.kind.procedure();
        self.store
            .rpc(procedure)
            .await
            .map_err(|err| ImportError::TransformProcedure {
                procedure: procedure.to_string(),
                message: err.to_string(),
            })?;

        info!(
            kind = request.kind.as_str(),
            count = records.len(),
            "Import completed"
        );
        Ok(ImportSummary {
            count: records.len(),
        })
    }
}
