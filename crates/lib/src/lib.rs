//! # Buyback Admin Core
//!
//! This crate provides the core logic for the device buyback admin backend:
//! the CSV import pipeline (parsing, header normalization, sanitization,
//! validation, and staged loading into the hosted data store), the
//! `TableStore` abstraction over that store, and the domain row types used
//! by the admin CRUD surface (catalog, multipliers, tips, leads).

pub mod errors;
pub mod import;
pub mod leads;
pub mod store;
pub mod types;

pub use errors::ImportError;
pub use import::{ImportKind, ImportRequest, ImportSummary, Importer};
pub use store::{Record, StoreError, TableStore};

/// Names of the production tables managed through the admin surface.
///
/// The two staging tables and their transform procedures are owned by
/// [`ImportKind`] since they are selected per import.
pub mod tables {
    pub const CATALOG: &str = "buyback_catalog";
    pub const LEADS: &str = "buyback_leads";
    pub const LEAD_EVENTS: &str = "buyback_lead_events";
    pub const MULTIPLIERS: &str = "buyback_multipliers_norm";
    pub const TIPS: &str = "buyback_ui_tips";
}
