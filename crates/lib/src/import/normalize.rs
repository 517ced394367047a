//! Header-cell normalization and alias resolution.
//!
//! Uploaded files come from several spreadsheet owners who spell columns
//! differently ("Capacity (GB)", "Opslag", "GB"). Each header cell is
//! reduced to a canonical form and then run through a fixed alias table so
//! the rest of the pipeline only ever sees canonical field names.

/// Known synonyms for canonical field names. Keys are already in
/// normalized form (lowercase, underscored), since aliasing runs after
/// [`normalize_key`].
const ALIASES: &[(&str, &str)] = &[
    ("storage", "storage_gb"),
    ("capacity", "storage_gb"),
    ("capacity_gb", "storage_gb"),
    ("geheugen", "storage_gb"),
    ("opslag", "storage_gb"),
    ("gb", "storage_gb"),
    ("price", "base_price"),
    ("buyback_price", "base_price"),
    ("prijs", "base_price"),
    ("amount", "base_price"),
    ("bouwjaar", "year"),
    ("jaar", "year"),
    ("model_year", "year"),
    ("release_year", "year"),
    ("ram", "ram_gb"),
    ("werkgeheugen", "ram_gb"),
    ("ssd", "ssd_gb"),
    ("ssd_capacity", "ssd_gb"),
    ("image", "image_url"),
    ("img", "image_url"),
    ("photo", "image_url"),
    ("afbeelding", "image_url"),
];

/// Folds the accented characters seen in the Dutch/French source files
/// down to their ASCII base letter. Anything unknown passes through and is
/// squashed to an underscore by the non-alphanumeric rule.
fn fold_diacritic(ch: char) -> char {
    match ch {
        'à' | 'á' | 'â' | 'ä' | 'ã' | 'å' => 'a',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ò' | 'ó' | 'ô' | 'ö' | 'õ' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Normalizes one raw header cell: lowercase, diacritics folded, every run
/// of non-alphanumeric characters collapsed to a single underscore, and
/// leading/trailing underscores trimmed.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars().flat_map(char::to_lowercase).map(fold_diacritic) {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    if out.ends_with('_') {
        out.pop();
    }
    out
}

/// Resolves one normalized key through the alias table. Unknown keys pass
/// through unchanged.
fn resolve_alias(normalized: &str) -> String {
    for (alias, canonical) in ALIASES {
        if *alias == normalized {
            return (*canonical).to_string();
        }
    }
    normalized.to_string()
}

/// Maps every raw header cell to its canonical field name, positionally
/// aligned with the original header.
pub fn normalize_header(header: &[String]) -> Vec<String> {
    header
        .iter()
        .map(|cell| resolve_alias(&normalize_key(cell)))
        .collect()
}
