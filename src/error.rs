// src/error.rs

use thiserror::Error;

/// Failure modes that make a view's dataset meaningless. Anything not listed
/// here (a block with no rows, an unparseable optional number) is recovered
/// locally and never surfaces as an error.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Backing fetch failed (network or auth). The view must halt rather
    /// than render partial data.
    #[error("sheet source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("worksheet `{0}` not found in spreadsheet")]
    WorksheetNotFound(String),

    /// No row satisfied the header hint (marker missing, or a fixed header
    /// row index past the end of the sheet).
    #[error("header not found: {0}")]
    HeaderNotFound(String),

    #[error("required column `{0}` missing after header resolution")]
    RequiredColumnMissing(String),

    /// Strict coercion only. Best-effort coercion nulls out instead.
    #[error("column `{column}` holds non-numeric value `{value}`")]
    NumericParse { column: String, value: String },
}
