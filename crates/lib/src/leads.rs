//! Lead-specific helpers: inline-edit parsing, IBAN masking, and the
//! operator CSV export.

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

pub use crate::import::fields::LEAD_STATUSES;
use crate::store::Record;

/// Columns requested from the store for the export, in output order.
pub const EXPORT_SELECT: &str = "created_at,source,model,capacity_gb,\
base_price_cents,final_price_cents,final_price_with_voucher_cents,voucher_bonus_cents,wants_voucher,\
first_name,last_name,email,phone,delivery_method,shop_location,\
street,house_number,postal_code,city,country,iban,answers,id";

/// Header row of the exported CSV. Money columns are converted to euros
/// and the IBAN is masked, hence the renamed headers.
const EXPORT_HEADER: &[&str] = &[
    "created_at",
    "source",
    "model",
    "capacity_gb",
    "base_price_eur",
    "final_price_eur",
    "final_with_voucher_eur",
    "voucher_bonus_eur",
    "wants_voucher",
    "first_name",
    "last_name",
    "email",
    "phone",
    "delivery_method",
    "shop_location",
    "street",
    "house_number",
    "postal_code",
    "city",
    "country",
    "iban_masked",
    "answers_json",
    "id",
];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write export CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to finalize export CSV: {0}")]
    Finish(String),
}

/// Parses an operator-entered euro amount ("12,50", "12.50", "12 500")
/// into cents. Returns `None` for empty, negative, or non-numeric input.
pub fn parse_price_to_cents(input: &str) -> Option<i64> {
    let normalized: String = input
        .chars()
        .filter(|ch| !ch.is_whitespace())
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect();
    if normalized.is_empty() {
        return None;
    }
    let amount: f64 = normalized.parse().ok()?;
    if !amount.is_finite() || amount < 0.0 {
        return None;
    }
    Some((amount * 100.0).round() as i64)
}

static UUID_RE: OnceLock<Regex> = OnceLock::new();

/// Whether `value` looks like a v1-v5 UUID. Lead ids come from the store
/// as UUIDs, so anything else is rejected before it reaches a filter.
pub fn is_uuid(value: &str) -> bool {
    let re = UUID_RE.get_or_init(|| {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
            .expect("uuid pattern is valid")
    });
    re.is_match(&value.to_ascii_lowercase())
}

/// Masks an IBAN down to its first and last four characters. Short values
/// pass through unmasked since there is nothing meaningful to hide.
/// Counts and slices in characters, since store values are free-form text.
pub fn mask_iban(iban: &str) -> String {
    let clean: String = iban.chars().filter(|ch| !ch.is_whitespace()).collect();
    let chars: Vec<char> = clean.chars().collect();
    if chars.len() <= 6 {
        return clean;
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}************{tail}")
}

fn cents_to_eur(value: Option<i64>) -> f64 {
    value.unwrap_or(0) as f64 / 100.0
}

fn str_field(record: &Record, key: &str) -> String {
    record
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn int_field(record: &Record, key: &str) -> Option<i64> {
    record.get(key).and_then(Value::as_i64)
}

/// Renders lead records into the operator export CSV.
pub fn export_csv(rows: &[Record]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;

    for record in rows {
        let final_price = int_field(record, "final_price_cents");
        let with_voucher = int_field(record, "final_price_with_voucher_cents").or(final_price);
        let wants_voucher = record
            .get("wants_voucher")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let answers = record.get("answers").cloned().unwrap_or(Value::Null);
        let answers_json = if answers.is_null() {
            "{}".to_string()
        } else {
            answers.to_string()
        };
        let capacity = int_field(record, "capacity_gb")
            .map(|n| n.to_string())
            .unwrap_or_default();

        writer.write_record(&[
            str_field(record, "created_at"),
            str_field(record, "source"),
            str_field(record, "model"),
            capacity,
            cents_to_eur(int_field(record, "base_price_cents")).to_string(),
            cents_to_eur(final_price).to_string(),
            cents_to_eur(with_voucher).to_string(),
            cents_to_eur(int_field(record, "voucher_bonus_cents")).to_string(),
            if wants_voucher { "yes" } else { "no" }.to_string(),
            str_field(record, "first_name"),
            str_field(record, "last_name"),
            str_field(record, "email"),
            str_field(record, "phone"),
            str_field(record, "delivery_method"),
            str_field(record, "shop_location"),
            str_field(record, "street"),
            str_field(record, "house_number"),
            str_field(record, "postal_code"),
            str_field(record, "city"),
            str_field(record, "country"),
            mask_iban(&str_field(record, "iban")),
            answers_json,
            str_field(record, "id"),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Finish(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::Finish(err.to_string()))
}
