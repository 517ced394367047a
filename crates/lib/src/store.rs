use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;
use thiserror::Error;

/// A single row as handed to or received from the data store.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Errors surfaced by a [`TableStore`] implementation.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// The request never produced a response (connection refused, timeout).
    #[error("Request to the data store failed: {0}")]
    Request(String),
    /// The store answered with a non-success status.
    #[error("The data store rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The response body could not be decoded.
    #[error("Failed to decode data store response: {0}")]
    Decode(String),
}

/// A trait for the hosted, table-oriented data store.
///
/// This is the seam between the admin backend and the external relational
/// service: row reads and writes plus invocation of named server-side
/// procedures, authenticated with service-level privileges. Filters and
/// query parameters use the store's `column=op.value` convention (for
/// example `("id", "eq.42")` or `("order", "created_at.desc")`).
#[async_trait]
pub trait TableStore: Send + Sync + DynClone + Debug {
    /// Fetches rows from `table`, shaped by the given query parameters.
    async fn select(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<Record>, StoreError>;

    /// Inserts `rows` into `table` as a single batch.
    async fn insert(&self, table: &str, rows: &[Record]) -> Result<(), StoreError>;

    /// Inserts `rows`, merging with existing rows that share the
    /// `on_conflict` key columns.
    async fn upsert(
        &self,
        table: &str,
        rows: &[Record],
        on_conflict: &str,
    ) -> Result<(), StoreError>;

    /// Applies `patch` to every row matching `filters`, returning the
    /// updated rows.
    async fn update(
        &self,
        table: &str,
        filters: &[(String, String)],
        patch: &Record,
    ) -> Result<Vec<Record>, StoreError>;

    /// Deletes every row matching `filters`.
    async fn delete(&self, table: &str, filters: &[(String, String)]) -> Result<(), StoreError>;

    /// Invokes the named server-side procedure with no arguments.
    async fn rpc(&self, function: &str) -> Result<(), StoreError>;
}

dyn_clone::clone_trait_object!(TableStore);
