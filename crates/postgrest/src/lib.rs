//! # `buyback-postgrest`: Hosted Data Store Client
//!
//! This crate implements the [`TableStore`] trait against the hosted
//! relational database's REST surface (PostgREST conventions: one resource
//! per table plus `rpc/<function>` for stored procedures). All requests
//! authenticate with the service-role key, which bypasses row-level
//! security; the client therefore belongs on the server side only and is
//! constructed from an explicit [`StoreConfig`] instead of ambient
//! environment state.

use async_trait::async_trait;
use buyback::{Record, StoreError, TableStore};
use reqwest::{Client as ReqwestClient, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;

/// Connection settings for the hosted store.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Project base URL, e.g. `https://xyz.supabase.co`.
    pub url: String,
    /// The service-role key. Grants full table access.
    pub service_role_key: String,
}

/// A reqwest-backed [`TableStore`] for the PostgREST surface.
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: ReqwestClient,
    base_url: String,
    service_role_key: String,
}

impl PostgrestClient {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(|err| StoreError::Request(err.to_string()))?;
        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            service_role_key: config.service_role_key,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    fn rpc_url(&self, function: &str) -> String {
        format!("{}/rest/v1/rpc/{function}", self.base_url)
    }

    /// Service-role authentication, sent on every request.
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.service_role_key)
            .bearer_auth(&self.service_role_key)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        let response = self
            .authed(request)
            .send()
            .await
            .map_err(|err| StoreError::Request(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response)
    }

    async fn decode_rows(response: Response) -> Result<Vec<Record>, StoreError> {
        response
            .json::<Vec<Record>>()
            .await
            .map_err(|err| StoreError::Decode(err.to_string()))
    }
}

#[async_trait]
impl TableStore for PostgrestClient {
    async fn select(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Vec<Record>, StoreError> {
        debug!(table, "select");
        let response = self
            .send(self.client.get(self.table_url(table)).query(query))
            .await?;
        Self::decode_rows(response).await
    }

    async fn insert(&self, table: &str, rows: &[Record]) -> Result<(), StoreError> {
        debug!(table, count = rows.len(), "insert");
        self.send(
            self.client
                .post(self.table_url(table))
                .header("Prefer", "return=minimal")
                .json(rows),
        )
        .await?;
        Ok(())
    }

    async fn upsert(
        &self,
        table: &str,
        rows: &[Record],
        on_conflict: &str,
    ) -> Result<(), StoreError> {
        debug!(table, count = rows.len(), on_conflict, "upsert");
        self.send(
            self.client
                .post(self.table_url(table))
                .query(&[("on_conflict", on_conflict)])
                .header("Prefer", "resolution=merge-duplicates,return=minimal")
                .json(rows),
        )
        .await?;
        Ok(())
    }

    async fn update(
        &self,
        table: &str,
        filters: &[(String, String)],
        patch: &Record,
    ) -> Result<Vec<Record>, StoreError> {
        debug!(table, "update");
        let response = self
            .send(
                self.client
                    .patch(self.table_url(table))
                    .query(filters)
                    .header("Prefer", "return=representation")
                    .json(patch),
            )
            .await?;
        Self::decode_rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[(String, String)]) -> Result<(), StoreError> {
        debug!(table, "delete");
        self.send(self.client.delete(self.table_url(table)).query(filters))
            .await?;
        Ok(())
    }

    async fn rpc(&self, function: &str) -> Result<(), StoreError> {
        debug!(function, "rpc");
        self.send(
            self.client
                .post(self.rpc_url(function))
                .json(&serde_json::json!({})),
        )
        .await?;
        Ok(())
    }
}
