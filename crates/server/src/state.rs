//! # Application State
//!
//! The shared state handed to every request handler: the configuration,
//! the store client, and the importer that owns the per-kind import locks.

use crate::config::Config;
use buyback::{Importer, TableStore};
use buyback_postgrest::PostgrestClient;
use std::sync::Arc;

/// The shared application state, accessible from all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn TableStore>,
    pub importer: Arc<Importer>,
}

/// Builds the application state from the configuration, constructing the
/// service-role store client once for the whole process.
pub fn build_app_state(config: Config) -> anyhow::Result<AppState> {
    let store: Arc<dyn TableStore> = Arc::new(PostgrestClient::new(config.store.clone())?);
    Ok(with_store(config, store))
}

/// Assembles the state around an existing store, letting tests inject a
/// mock implementation.
pub fn with_store(config: Config, store: Arc<dyn TableStore>) -> AppState {
    let importer = Arc::new(Importer::new(store.clone()));
    AppState {
        config: Arc::new(config),
        store,
        importer,
    }
}
