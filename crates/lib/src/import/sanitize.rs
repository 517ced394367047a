//! Record building and value sanitization.
//!
//! Each parsed row is zipped against the canonical header, filtered down
//! to the allow-list for the import kind, and then coerced: numeric price
//! columns become integers (or null), and empty strings become null
//! everywhere so the staging table never stores `""`.

use serde_json::Value;

use super::fields::{is_multiplier_field, is_price_field, PRICE_INT_FIELDS};
use super::ImportKind;
use crate::store::Record;

/// Extracts an integer from a free-form cell like `"128GB"` or `" 2 019"`.
///
/// Every character other than digits and minus signs is stripped before
/// parsing; a cell with no digits left (`"n/a"`, `"-"`) yields `None`.
/// This never fails: unparseable input is simply absent.
pub fn coerce_int(raw: &str) -> Option<i64> {
    let stripped: String = raw
        .chars()
        .filter(|ch| ch.is_ascii_digit() || *ch == '-')
        .collect();
    if stripped.is_empty() || stripped == "-" {
        return None;
    }
    stripped.parse().ok()
}

fn sanitize_value(kind: ImportKind, field: &str, raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    if kind == ImportKind::Prices && PRICE_INT_FIELDS.contains(&field) {
        return match coerce_int(raw) {
            Some(n) => Value::from(n),
            None => Value::Null,
        };
    }
    Value::from(raw)
}

/// Builds one sanitized record per row, in row order.
///
/// Fields outside the kind's allow-list are dropped; fields absent from a
/// row are simply omitted rather than set to null, matching what the
/// staging insert expects.
pub fn build_records(
    kind: ImportKind,
    canonical_header: &[String],
    rows: &[Vec<String>],
) -> Vec<Record> {
    let allowed: Vec<bool> = canonical_header
        .iter()
        .map(|field| match kind {
            ImportKind::Prices => is_price_field(field),
            ImportKind::Multipliers => is_multiplier_field(field),
        })
        .collect();

    rows.iter()
        .map(|row| {
            let mut record = Record::new();
            for ((field, cell), keep) in canonical_header.iter().zip(row).zip(&allowed) {
                if *keep {
                    record.insert(field.clone(), sanitize_value(kind, field, cell));
                }
            }
            record
        })
        .collect()
}
