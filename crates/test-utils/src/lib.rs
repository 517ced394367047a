//! # Shared Test Utilities
//!
//! A recording, scriptable [`TableStore`] double used by the integration
//! tests across the workspace. Tests can program specific calls to fail
//! and then assert on the exact call sequence and staged rows the code
//! under test produced.

use async_trait::async_trait;
use buyback::{Record, StoreError, TableStore};
use std::sync::{Arc, Mutex};

/// One recorded call against the mock store, in call order.
#[derive(Debug, Clone)]
pub enum StoreCall {
    Select { table: String },
    Insert { table: String, count: usize },
    Upsert { table: String, on_conflict: String, count: usize },
    Update { table: String, filters: Vec<(String, String)> },
    Delete { table: String, filters: Vec<(String, String)> },
    Rpc { function: String },
}

/// An in-memory [`TableStore`] with scripted failure points.
#[derive(Debug, Clone, Default)]
pub struct MockTableStore {
    calls: Arc<Mutex<Vec<StoreCall>>>,
    staged: Arc<Mutex<Vec<Record>>>,
    select_rows: Arc<Mutex<Vec<Record>>>,
    insert_calls_seen: Arc<Mutex<usize>>,
    fail_insert_call: Arc<Mutex<Option<usize>>>,
    fail_delete: Arc<Mutex<bool>>,
    fail_rpc: Arc<Mutex<bool>>,
    fail_select: Arc<Mutex<bool>>,
}

impl MockTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the Nth insert call (0-based) fail with a store rejection.
    pub fn fail_insert_call(&self, index: usize) {
        *self.fail_insert_call.lock().unwrap() = Some(index);
    }

    pub fn fail_delete(&self) {
        *self.fail_delete.lock().unwrap() = true;
    }

    pub fn fail_rpc(&self) {
        *self.fail_rpc.lock().unwrap() = true;
    }

    pub fn fail_select(&self) {
        *self.fail_select.lock().unwrap() = true;
    }

    /// Pre-programs the rows every `select` call returns.
    pub fn set_select_rows(&self, rows: Vec<Record>) {
        *self.select_rows.lock().unwrap() = rows;
    }

    pub fn calls(&self) -> Vec<StoreCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn staged_rows(&self) -> Vec<Record> {
        self.staged.lock().unwrap().clone()
    }

    pub fn staged_row_count(&self) -> usize {
        self.staged.lock().unwrap().len()
    }

    fn record(&self, call: StoreCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn rejection(reason: &str) -> StoreError {
        StoreError::Rejected {
            status: 500,
            message: reason.to_string(),
        }
    }
}

#[async_trait]
impl TableStore for MockTableStore {
    async fn select(
        &self,
        table: &str,
        _query: &[(String, String)],
    ) -> Result<Vec<Record>, StoreError> {
        self.record(StoreCall::Select {
            table: table.to_string(),
        });
        if *self.fail_select.lock().unwrap() {
            return Err(Self::rejection("forced select failure"));
        }
        Ok(self.select_rows.lock().unwrap().clone())
    }

    async fn insert(&self, table: &str, rows: &[Record]) -> Result<(), StoreError> {
        self.record(StoreCall::Insert {
            table: table.to_string(),
            count: rows.len(),
        });
        let index = {
            let mut seen = self.insert_calls_seen.lock().unwrap();
            let index = *seen;
            *seen += 1;
            index
        };
        if *self.fail_insert_call.lock().unwrap() == Some(index) {
            return Err(Self::rejection("forced insert failure"));
        }
        self.staged.lock().unwrap().extend(rows.iter().cloned());
        Ok(())
    }

    async fn upsert(
        &self,
        table: &str,
        rows: &[Record],
        on_conflict: &str,
    ) -> Result<(), StoreError> {
        self.record(StoreCall::Upsert {
            table: table.to_string(),
            on_conflict: on_conflict.to_string(),
            count: rows.len(),
        });
        self.staged.lock().unwrap().extend(rows.iter().cloned());
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        filters: &[(String, String)],
        patch: &Record,
    ) -> Result<Vec<Record>, StoreError> {
        self.record(StoreCall::Update {
            table: table.to_string(),
            filters: filters.to_vec(),
        });
        Ok(vec![patch.clone()])
    }

    async fn delete(&self, table: &str, filters: &[(String, String)]) -> Result<(), StoreError> {
        self.record(StoreCall::Delete {
            table: table.to_string(),
            filters: filters.to_vec(),
        });
        if *self.fail_delete.lock().unwrap() {
            return Err(Self::rejection("forced delete failure"));
        }
        self.staged.lock().unwrap().clear();
        Ok(())
    }

    async fn rpc(&self, function: &str) -> Result<(), StoreError> {
        self.record(StoreCall::Rpc {
            function: function.to_string(),
        });
        if *self.fail_rpc.lock().unwrap() {
            return Err(Self::rejection("forced procedure failure"));
        }
        Ok(())
    }
}
