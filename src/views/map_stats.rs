// src/views/map_stats.rs

use tracing::instrument;

use crate::error::SheetError;
use crate::normalize::{resolve_header, HeaderHint, Table};
use crate::RawSheet;

/// The map-performance sheet moves its header around as rows get inserted
/// above it, so the header is found by marker rather than fixed index.
const MARKER: &str = "Maps";

/// Normalize the per-map win/loss worksheet: marker-located header, rows
/// without a map name dropped, and every fully-numeric column coerced so the
/// rate columns are ready for arithmetic.
#[instrument(level = "info", skip(sheet), fields(rows = sheet.len()))]
pub fn load(sheet: &RawSheet) -> Result<Table, SheetError> {
    let (index, headers) = resolve_header(sheet, HeaderHint::Marker(MARKER))?;

    // The key column may have been renamed by disambiguation; locate it
    // case-insensitively among the resolved names.
    let maps_col = headers
        .iter()
        .find(|h| h.trim().eq_ignore_ascii_case(MARKER))
        .cloned()
        .ok_or_else(|| SheetError::RequiredColumnMissing(MARKER.to_string()))?;

    let mut table = Table::from_rows(&headers, &sheet[index + 1..], Some(&maps_col))?;
    table.auto_coerce();
    Ok(table)
}
