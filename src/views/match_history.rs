// src/views/match_history.rs

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::instrument;

use crate::error::SheetError;
use crate::normalize::{coalesce, project, resolve_header, ColumnGroup, HeaderHint, Table};
use crate::RawSheet;

/// The sheet's header sits below two rows of title banners.
const HEADER_ROW: usize = 2;
const REQUIRED: &str = "Opponent";

/// The three per-lineup roster columns go by color nicknames in the sheet.
static ROSTER_COLUMN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)roster|pink|cyan").expect("roster pattern should be valid"));

/// Stable output schema for the match-history table.
pub static FINAL_COLUMNS: &[&str] = &[
    "Opponent",
    "DATE",
    "TIME (SGT)",
    "Played",
    "Differential",
    "Won",
    "Lost",
    "ATK W",
    "ATK L",
    "DEF W",
    "DEF L",
    "Type of Match",
    "Map",
    "Result",
    "Game Level",
    "Scrim Quality",
    "VOD Link",
    "Notes",
    "Rosters",
    "Pistols (ATK)",
    "Pistols (DEF)",
    "Comp",
];

/// Normalize the match-history worksheet: fixed header row, rows without an
/// opponent dropped, the color-named roster columns merged into `Rosters`,
/// and the result projected onto the stable schema.
#[instrument(level = "info", skip(sheet), fields(rows = sheet.len()))]
pub fn load(sheet: &RawSheet) -> Result<Table, SheetError> {
    let (index, headers) = resolve_header(sheet, HeaderHint::Row(HEADER_ROW))?;
    let mut table = Table::from_rows(&headers, &sheet[index + 1..], Some(REQUIRED))?;
    table.rename("TIME(SGT)", "TIME (SGT)");

    let roster_cols: Vec<String> = table
        .headers()
        .iter()
        .filter(|h| ROSTER_COLUMN.is_match(h))
        .cloned()
        .collect();
    if !roster_cols.is_empty() {
        table = coalesce(&table, &ColumnGroup::new("Rosters", roster_cols));
    }

    Ok(project(&table, FINAL_COLUMNS))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet(rows: &[&[&str]]) -> RawSheet {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn normalizes_the_whole_worksheet() {
        let sheet = sheet(&[
            &["SCRIM LOG", "", ""],
            &["", "", ""],
            &[
                "Opponent", "Map", "Result", "Roster Pink", "Roster Cyan", "TIME(SGT)", "Won",
            ],
            &["TeamA", "Ascent", "Win", "rus, solo", "", "19:00", "13"],
            &["", "Bind", "Loss", "", "", "21:00", "5"],
            &["TeamB", "Lotus", "Win", "jayloh", "slash", "20:00", "13"],
        ]);

        let table = load(&sheet).unwrap();

        // Empty-opponent row filtered, order preserved.
        let opponents: Vec<_> = table
            .column("Opponent")
            .unwrap()
            .map(|c| c.as_text().into_owned())
            .collect();
        assert_eq!(opponents, vec!["TeamA", "TeamB"]);

        // Roster columns merged and the fixed-up time column kept.
        let rosters: Vec<_> = table
            .column("Rosters")
            .unwrap()
            .map(|c| c.as_text().into_owned())
            .collect();
        assert_eq!(rosters, vec!["rus, solo", "jayloh | slash"]);
        assert!(table.column_index("TIME (SGT)").is_some());
        assert!(table.column_index("Roster Pink").is_none());

        // Projection keeps the stable schema's relative order.
        assert_eq!(
            table.headers(),
            &["Opponent", "TIME (SGT)", "Won", "Map", "Result", "Rosters"]
        );
    }

    #[test]
    fn missing_opponent_column_is_required_column_missing() {
        let sheet = sheet(&[
            &["banner"],
            &[""],
            &["Map", "Result"],
            &["Ascent", "Win"],
        ]);
        assert!(matches!(
            load(&sheet).unwrap_err(),
            SheetError::RequiredColumnMissing(_)
        ));
    }

    #[test]
    fn short_sheet_is_header_not_found() {
        let sheet = sheet(&[&["only row"]]);
        assert!(matches!(
            load(&sheet).unwrap_err(),
            SheetError::HeaderNotFound(_)
        ));
    }
}
