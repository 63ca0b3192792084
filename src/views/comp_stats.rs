// src/views/comp_stats.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::instrument;

use crate::error::SheetError;
use crate::normalize::{coalesce, merge_header_rows, Coercion, ColumnGroup, Table};
use crate::RawSheet;

/// The comp sheet carries a two-row header block: group labels on the first
/// row, sub labels on the third, data from the fourth.
const GROUP_ROW: usize = 0;
const SUB_ROW: usize = 2;
const DATA_START: usize = 3;

/// Round-count columns summed by the aggregates; parse failures become
/// nulls so the sums stay total.
const STAT_COLUMNS: &[&str] = &["ATK W", "ATK L", "DEF W", "DEF L"];

static AGENT_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)agent").expect("agent pattern should be valid"));

/// Normalize the composition worksheet: merge the two-row header, coerce the
/// round counters, and coalesce the per-slot agent columns (sorted by name)
/// into a single `Comp` string.
#[instrument(level = "info", skip(sheet), fields(rows = sheet.len()))]
pub fn load(sheet: &RawSheet) -> Result<Table, SheetError> {
    if sheet.len() <= SUB_ROW {
        return Err(SheetError::HeaderNotFound(format!(
            "two-row header needs at least {} rows, sheet has {}",
            SUB_ROW + 1,
            sheet.len()
        )));
    }

    let headers = merge_header_rows(&sheet[GROUP_ROW], &sheet[SUB_ROW]);
    let mut table = Table::from_rows(&headers, &sheet[DATA_START..], None)?;
    for column in STAT_COLUMNS {
        table.coerce(column, Coercion::BestEffort)?;
    }

    let mut agent_cols: Vec<String> = table
        .headers()
        .iter()
        .filter(|h| AGENT_COLUMN.is_match(h))
        .cloned()
        .collect();
    agent_cols.sort();
    if !agent_cols.is_empty() {
        table = coalesce(&table, &ColumnGroup::new("Comp", agent_cols));
    }

    Ok(table)
}
