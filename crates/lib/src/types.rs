//! Domain row types for the admin CRUD surface.
//!
//! These mirror the production tables the transform procedures write into.
//! Validation is deliberately shallow: the store owns the real constraints,
//! this layer just rejects inputs that would be confusing to debug there.

use serde::{Deserialize, Serialize};

use crate::import::fields::{is_question_key, is_tip_key};
use crate::store::Record;

fn default_true() -> bool {
    true
}

/// One catalog entry, unique on (brand, model, variant, capacity_gb).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRow {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub variant: Option<String>,
    pub capacity_gb: i64,
    pub base_price_cents: i64,
    #[serde(default = "default_true")]
    pub active: bool,
}

/// The natural key of a catalog row, used for deletes.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogKey {
    pub brand: String,
    pub model: String,
    #[serde(default)]
    pub variant: Option<String>,
    pub capacity_gb: i64,
}

impl CatalogRow {
    pub fn validate(&self) -> Result<(), String> {
        if self.brand.trim().is_empty() {
            return Err("brand must not be empty".to_string());
        }
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if self.capacity_gb <= 0 {
            return Err("capacity_gb must be positive".to_string());
        }
        if self.base_price_cents < 0 {
            return Err("base_price_cents must not be negative".to_string());
        }
        Ok(())
    }
}

/// One multiplier rule, unique on (model, question_key, option_key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MultiplierRow {
    pub model: String,
    pub question_key: String,
    pub option_key: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub tip: Option<String>,
    pub multiplier_value: f64,
    #[serde(default)]
    pub priority: Option<i64>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// The natural key of a multiplier rule.
#[derive(Debug, Clone, Deserialize)]
pub struct MultiplierKey {
    pub model: String,
    pub question_key: String,
    pub option_key: String,
}

impl MultiplierRow {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !is_question_key(&self.question_key) {
            return Err(format!("unknown question_key: {}", self.question_key));
        }
        if self.option_key.trim().is_empty() {
            return Err("option_key must not be empty".to_string());
        }
        Ok(())
    }

    /// Applies the defaults the admin UI relies on: rules are active with
    /// priority 100 unless stated otherwise.
    pub fn with_defaults(mut self) -> Self {
        self.active.get_or_insert(true);
        self.priority.get_or_insert(100);
        self
    }
}

/// One UI tip, unique on (model, tip_key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipRow {
    pub model: String,
    pub tip_key: String,
    pub tip: String,
}

/// The natural key of a tip.
#[derive(Debug, Clone, Deserialize)]
pub struct TipKey {
    pub model: String,
    pub tip_key: String,
}

impl TipRow {
    pub fn validate(&self) -> Result<(), String> {
        if self.model.trim().is_empty() {
            return Err("model must not be empty".to_string());
        }
        if !is_tip_key(&self.tip_key) {
            return Err(format!("unknown tip_key: {}", self.tip_key));
        }
        if self.tip.trim().is_empty() {
            return Err("tip must not be empty".to_string());
        }
        Ok(())
    }
}

/// Serializes a typed row into the JSON map shape the store expects.
///
/// Serialization of these plain field structs cannot fail, so a failure
/// here is a programming error and maps to an empty record at worst.
pub fn to_record<T: Serialize>(row: &T) -> Record {
    match serde_json::to_value(row) {
        Ok(serde_json::Value::Object(map)) => map,
        _ => Record::new(),
    }
}
