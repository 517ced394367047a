pub mod catalog;
pub mod diag;
pub mod general;
pub mod import;
pub mod leads;
pub mod multipliers;
pub mod tips;

pub use catalog::{delete_catalog, list_catalog, upsert_catalog};
pub use diag::diag_handler;
pub use general::{health_check, root};
pub use import::import_csv_handler;
pub use leads::{delete_lead, export_leads, list_lead_events, list_leads, update_lead};
pub use multipliers::{delete_multiplier, list_multipliers, upsert_multiplier};
pub use tips::{delete_tip, list_tips, upsert_tip};
