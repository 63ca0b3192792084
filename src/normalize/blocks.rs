// src/normalize/blocks.rs

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::header::disambiguate;
use super::table::{Cell, Table};

/// Token the sheet uses for "no value"; treated as empty everywhere in this
/// module.
const NA: &str = "N/A";

/// A contiguous, inclusive column range owned by one player. Ranges never
/// overlap; every block shares the same local header row offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerBlock {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

fn is_blankish(s: &str) -> bool {
    s.is_empty() || s == NA
}

fn slice<'a>(row: &'a [String], block: &PlayerBlock) -> Vec<&'a str> {
    (block.start..=block.end).map(|i| super::cell(row, i)).collect()
}

/// Extract one player's block as a table, or `None` when the block holds no
/// data rows; the caller skips absent blocks rather than treating them as
/// errors.
///
/// The local header comes from `header_row`, with `Col{i}` standing in for
/// blank cells; when the block's arity matches `expected`, the canonical
/// names override whatever the sheet claims. Data rows are scanned from
/// `data_start` until the first fully-empty row; rows that are blank-or-N/A
/// in every cell are skipped without ending the scan.
pub fn extract_block(
    sheet: &[Vec<String>],
    block: &PlayerBlock,
    header_row: usize,
    data_start: usize,
    expected: Option<&[&str]>,
) -> Option<Table> {
    let local = sheet.get(header_row).map(|r| slice(r, block))?;

    let mut headers: Vec<String> = local
        .iter()
        .enumerate()
        .map(|(i, h)| {
            if h.is_empty() {
                format!("Col{i}")
            } else {
                h.to_string()
            }
        })
        .collect();
    if let Some(canonical) = expected {
        if headers.len() == canonical.len() {
            headers = canonical.iter().map(|s| s.to_string()).collect();
        }
    }
    let headers = disambiguate(&headers);

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for raw in sheet.iter().skip(data_start) {
        let cells = slice(raw, block);
        if cells.iter().all(|c| c.is_empty()) {
            break; // end-of-data sentinel
        }
        if cells.iter().all(|c| is_blankish(c)) {
            continue; // stray formatting row, keep scanning
        }
        rows.push(
            cells
                .into_iter()
                .map(|c| {
                    if is_blankish(c) {
                        Cell::Null
                    } else {
                        Cell::Text(c.to_string())
                    }
                })
                .collect(),
        );
    }

    if rows.is_empty() {
        debug!(player = %block.name, "block has no data rows, skipping");
        return None;
    }
    Some(Table::from_parts(headers, rows))
}

/// Extract every block and concatenate into one long-format table, stamping
/// each row with the owning player's name under `identity`. This is the only
/// place identity enters; no single block carries it. Returns `None` when
/// every block is absent.
pub fn stitch_blocks(
    sheet: &[Vec<String>],
    blocks: &[PlayerBlock],
    header_row: usize,
    data_start: usize,
    expected: Option<&[&str]>,
    identity: &str,
) -> Option<Table> {
    let mut headers: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for block in blocks {
        let table = match extract_block(sheet, block, header_row, data_start, expected) {
            Some(t) => t,
            None => continue,
        };
        let width = headers
            .get_or_insert_with(|| {
                let mut h = table.headers().to_vec();
                h.push(identity.to_string());
                h
            })
            .len();
        for row in table.rows() {
            let mut row = row.clone();
            row.push(Cell::Text(block.name.clone()));
            row.resize(width, Cell::Null);
            rows.push(row);
        }
    }

    headers.map(|h| Table::from_parts(h, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPECTED: &[&str] = &["KDA", "Kills", "Deaths", "Assists", "ACS", "FK", "FD", "Agent"];

    fn sheet(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn block(name: &str, start: usize, end: usize) -> PlayerBlock {
        PlayerBlock {
            name: name.to_string(),
            start,
            end,
        }
    }

    #[test]
    fn scan_skips_na_rows_and_stops_at_empty() {
        let sheet = sheet(&[
            &["hdr_a", "hdr_b"],
            &["1.2", "200"],
            &["0.9", "180"],
            &["N/A", "N/A"],
            &["1.5", "240"],
            &["", ""],
            &["9.9", "999"],
        ]);
        let t = extract_block(&sheet, &block("Rus", 0, 1), 0, 1, None).unwrap();
        assert_eq!(t.len(), 3);
        let col: Vec<_> = t.column("hdr_a").unwrap().map(|c| c.as_text().into_owned()).collect();
        assert_eq!(col, vec!["1.2", "0.9", "1.5"]);
    }

    #[test]
    fn blank_headers_get_positional_placeholders() {
        let sheet = sheet(&[&["KDA", "", "Deaths"], &["1.0", "12", "9"]]);
        let t = extract_block(&sheet, &block("Solo", 0, 2), 0, 1, None).unwrap();
        assert_eq!(t.headers(), &["KDA", "Col1", "Deaths"]);
    }

    #[test]
    fn matching_arity_overrides_unreliable_headers() {
        let sheet = sheet(&[
            &["kda??", "", "d", "a", "", "fk", "fd", "agent played"],
            &["1.0", "10", "8", "4", "210", "2", "1", "Jett"],
        ]);
        let t = extract_block(&sheet, &block("Jayloh", 0, 7), 0, 1, Some(EXPECTED)).unwrap();
        assert_eq!(t.headers(), EXPECTED);
    }

    #[test]
    fn empty_block_is_absent_not_error() {
        let sheet = sheet(&[&["KDA", "Kills"], &["N/A", "N/A"], &["", ""]]);
        assert!(extract_block(&sheet, &block("Jfz", 0, 1), 0, 1, None).is_none());
    }

    #[test]
    fn na_cells_become_null_in_kept_rows() {
        let sheet = sheet(&[&["KDA", "Kills"], &["1.1", "N/A"]]);
        let t = extract_block(&sheet, &block("Slash", 0, 1), 0, 1, None).unwrap();
        assert_eq!(t.get(0, "Kills"), Some(&Cell::Null));
    }

    #[test]
    fn stitch_stamps_identity_and_skips_absent_blocks() {
        // Two side-by-side blocks; the second has no data.
        let sheet = sheet(&[
            &["KDA", "Kills", "KDA", "Kills"],
            &["1.2", "14", "", ""],
            &["0.8", "9", "", ""],
        ]);
        let blocks = vec![block("Rus", 0, 1), block("Solo", 2, 3)];
        let t = stitch_blocks(&sheet, &blocks, 0, 1, None, "Player").unwrap();
        assert_eq!(t.headers(), &["KDA", "Kills", "Player"]);
        assert_eq!(t.len(), 2);
        let players: Vec<_> = t.column("Player").unwrap().map(|c| c.as_text().into_owned()).collect();
        assert_eq!(players, vec!["Rus", "Rus"]);
    }

    #[test]
    fn stitch_with_no_data_anywhere_is_none() {
        let sheet = sheet(&[&["KDA", "Kills"], &["", ""]]);
        let blocks = vec![block("Rus", 0, 1)];
        assert!(stitch_blocks(&sheet, &blocks, 0, 1, None, "Player").is_none());
    }
}
