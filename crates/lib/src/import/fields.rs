//! Allow-lists and required-column sets per import kind.
//!
//! The multiplier upload is a wide sheet: one column per question option
//! and attribute, spanning the fixed question/option matrix used by the
//! buyback widget, plus per-question titles and the delivery/payment tips.
//! Rather than spelling out all of those columns, membership is checked
//! structurally against the matrix.

/// Columns accepted from a price/catalog upload.
pub const PRICE_FIELDS: &[&str] = &[
    "brand",
    "category",
    "model",
    "submodel",
    "variant",
    "year",
    "storage_gb",
    "connectivity",
    "cpu",
    "ram_gb",
    "ssd_gb",
    "base_price",
    "image_url",
];

/// Price columns the staging table expects as integers.
pub const PRICE_INT_FIELDS: &[&str] = &["year", "storage_gb", "ram_gb", "ssd_gb"];

/// Canonical columns a price upload must contain.
pub const PRICE_REQUIRED: &[&str] = &["brand", "model", "storage_gb", "base_price"];

/// Canonical columns a multiplier upload must contain.
pub const MULTIPLIER_REQUIRED: &[&str] = &["model"];

/// The widget's question keys and their fixed option keys.
pub const QUESTIONS: &[(&str, &[&str])] = &[
    ("functional", &["ja", "neen", "klein"]),
    ("screen", &["geen", "klein", "groot"]),
    ("housing", &["minimaal", "sporen", "zwaar"]),
    ("battery", &["100", "gt85", "le85", "unknown"]),
    ("eu", &["yes", "no"]),
    ("icloud", &["yes", "no"]),
];

/// Delivery and payment tip keys (unique per model in `buyback_ui_tips`).
pub const TIP_KEYS: &[&str] = &[
    "ship_opzenden",
    "ship_binnenbrengen",
    "store_gentbrugge",
    "store_antwerpen",
    "store_oudenaarde",
    "pay_bank",
    "pay_voucher",
];

/// Lead statuses accepted by the inline lead editor.
pub const LEAD_STATUSES: &[&str] = &[
    "new",
    "received_store",
    "label_created",
    "shipment_received",
    "check_passed",
    "check_failed",
    "done",
];

pub fn is_price_field(name: &str) -> bool {
    PRICE_FIELDS.contains(&name)
}

pub fn is_question_key(name: &str) -> bool {
    QUESTIONS.iter().any(|(question, _)| *question == name)
}

pub fn is_tip_key(name: &str) -> bool {
    TIP_KEYS.contains(&name)
}

/// Whether `name` is an accepted multiplier-upload column: `model`, a
/// `{question}_title`, a `{question}_{option}_{value|label|tip}` cell from
/// the matrix, or a `{tip_key}_tip` column.
pub fn is_multiplier_field(name: &str) -> bool {
    if name == "model" {
        return true;
    }
    if let Some(prefix) = name.strip_suffix("_tip") {
        if is_tip_key(prefix) {
            return true;
        }
    }
    for (question, options) in QUESTIONS {
        let Some(rest) = name
            .strip_prefix(question)
            .and_then(|rest| rest.strip_prefix('_'))
        else {
            continue;
        };
        if rest == "title" {
            return true;
        }
        for option in *options {
            if let Some(attribute) = rest
                .strip_prefix(option)
                .and_then(|rest| rest.strip_prefix('_'))
            {
                if matches!(attribute, "value" | "label" | "tip") {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_allow_list_membership() {
        assert!(is_price_field("brand"));
        assert!(is_price_field("image_url"));
        assert!(!is_price_field("multiplier_value"));
        assert!(!is_price_field("unknown_column"));
    }

    #[test]
    fn multiplier_matrix_membership() {
        assert!(is_multiplier_field("model"));
        assert!(is_multiplier_field("functional_title"));
        assert!(is_multiplier_field("functional_ja_value"));
        assert!(is_multiplier_field("battery_gt85_label"));
        assert!(is_multiplier_field("battery_100_tip"));
        assert!(is_multiplier_field("icloud_no_value"));
        assert!(is_multiplier_field("ship_opzenden_tip"));
        assert!(is_multiplier_field("pay_voucher_tip"));
    }

    #[test]
    fn multiplier_matrix_rejects_near_misses() {
        assert!(!is_multiplier_field("functional_maybe_value"));
        assert!(!is_multiplier_field("screen_klein_bonus"));
        assert!(!is_multiplier_field("battery_title_extra"));
        assert!(!is_multiplier_field("ship_opzenden"));
        assert!(!is_multiplier_field("brand"));
    }
}
