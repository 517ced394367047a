use serde_json::{json, Value};
use thiserror::Error;

/// The error taxonomy of the CSV import pipeline.
///
/// Every variant is terminal for the current import call: the pipeline owns
/// no retry logic, and callers receive a structured failure instead of an
/// unwound panic. The variants are ordered by the pipeline stage that
/// produces them, which also determines how much damage the staging table
/// may have taken (none before `StagingDelete`, partial from
/// `StagingInsert`, fully staged but untransformed for
/// `TransformProcedure`).
#[derive(Error, Debug)]
pub enum ImportError {
    /// The request shape itself was invalid (wrong kind, payload too small).
    #[error("Invalid import request: {0}")]
    InvalidRequest(String),

    /// Fewer than two non-blank lines: a header plus at least one data row
    /// is required.
    #[error("The file is empty: a header line and at least one data row are required")]
    EmptyInput,

    /// A line could not be split into cells, either because of an
    /// unbalanced quote or because its cell count does not match the header.
    #[error("Failed to parse line {line}: {reason}")]
    Parse { line: usize, reason: String },

    /// Required canonical columns are absent from the normalized header.
    /// Carries the detected headers and delimiter so an operator can see
    /// what the file actually contained.
    #[error("Missing required columns: {}", missing.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        detected: Vec<String>,
        delimiter: char,
    },

    /// Clearing the staging table failed; nothing was inserted.
    #[error("Failed to clear staging table {table}: {message}")]
    StagingDelete { table: String, message: String },

    /// A batch insert failed. All batches before `offset` are in the
    /// staging table; the failing batch and everything after it are not.
    /// `example` is the first record of the failing batch.
    #[error("Failed to insert batch starting at record {offset} into {table}: {message}")]
    StagingInsert {
        table: String,
        offset: usize,
        message: String,
        example: Value,
    },

    /// The transform procedure failed after staging fully succeeded. The
    /// staging table holds the complete upload, so the remedy is to re-run
    /// the procedure, not to re-upload the file.
    #[error(
        "Transform procedure {procedure} failed after staging completed; \
         the staging table is fully populated, re-run the procedure instead of re-uploading: {message}"
    )]
    TransformProcedure { procedure: String, message: String },
}

impl ImportError {
    /// Diagnostic payload for the structured `{ ok: false, error, details }`
    /// failure body. `None` when the message alone is enough.
    pub fn details(&self) -> Option<Value> {
        match self {
            ImportError::Parse { line, .. } => Some(json!({ "line": line })),
            ImportError::MissingColumns {
                missing,
                detected,
                delimiter,
            } => Some(json!({
                "missing": missing,
                "detected_headers": detected,
                "delimiter": delimiter.to_string(),
            })),
            ImportError::StagingInsert {
                offset, example, ..
            } => Some(json!({ "offset": offset, "example": example })),
            _ => None,
        }
    }
}
