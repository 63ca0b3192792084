// src/views/player_stats.rs

use tracing::instrument;

use crate::normalize::{project, stitch_blocks, Coercion, PlayerBlock, Table};
use crate::RawSheet;

/// Every player block shares one local header row and data offset.
const HEADER_ROW: usize = 5;
const DATA_START: usize = 6;

/// The human-typed block headers drift; arity is fixed by convention, so an
/// 8-wide block always gets the canonical names.
pub static EXPECTED_HEADERS: &[&str] =
    &["KDA", "Kills", "Deaths", "Assists", "ACS", "FK", "FD", "Agent"];

/// Identity column stamped onto the stitched long-format table.
pub const IDENTITY: &str = "Player";

pub static FINAL_COLUMNS: &[&str] = &[
    "KDA", "Kills", "Deaths", "Assists", "ACS", "FK", "FD", "Agent", "Player",
];

const NUMERIC_COLUMNS: &[&str] = &["Kills", "Deaths", "Assists", "ACS", "FK", "FD"];

/// Extract every player's fixed column block from the scrim-stats worksheet
/// and stitch them into one long table. `None` means no block held any data,
/// and the caller shows an empty state instead of a table.
#[instrument(level = "info", skip(sheet, blocks), fields(rows = sheet.len(), players = blocks.len()))]
pub fn load(sheet: &RawSheet, blocks: &[PlayerBlock]) -> Option<Table> {
    let stitched = stitch_blocks(
        sheet,
        blocks,
        HEADER_ROW,
        DATA_START,
        Some(EXPECTED_HEADERS),
        IDENTITY,
    )?;

    let mut table = project(&stitched, FINAL_COLUMNS);
    for column in NUMERIC_COLUMNS {
        table
            .coerce(column, Coercion::BestEffort)
            .expect("best-effort coercion does not fail");
    }
    Some(table)
}
