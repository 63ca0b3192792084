// src/normalize/header.rs

use std::collections::HashSet;

use crate::error::SheetError;

/// How to locate the header row within a raw sheet.
#[derive(Debug, Clone, Copy)]
pub enum HeaderHint<'a> {
    /// The header is exactly this row.
    Row(usize),
    /// The header is the first row containing a cell whose trimmed value
    /// equals this token, case-insensitively.
    Marker(&'a str),
}

/// Locate the header row and return `(row_index, names)` with blanks and
/// duplicates resolved. Same input always yields the same output, and the
/// returned names are pairwise distinct.
pub fn resolve_header(
    rows: &[Vec<String>],
    hint: HeaderHint<'_>,
) -> Result<(usize, Vec<String>), SheetError> {
    let index = match hint {
        HeaderHint::Row(i) => {
            if i >= rows.len() {
                return Err(SheetError::HeaderNotFound(format!(
                    "fixed header row {} past end of sheet ({} rows)",
                    i,
                    rows.len()
                )));
            }
            i
        }
        HeaderHint::Marker(token) => rows
            .iter()
            .position(|row| row.iter().any(|c| c.trim().eq_ignore_ascii_case(token)))
            .ok_or_else(|| SheetError::HeaderNotFound(format!("no row contains `{token}`")))?,
    };

    Ok((index, disambiguate(&rows[index])))
}

/// Resolve a two-row header block: the sub-label wins when non-empty, else
/// the group-label, else `Unknown`. The merged names go through the same
/// disambiguation as a single-row header.
pub fn merge_header_rows(group: &[String], sub: &[String]) -> Vec<String> {
    let width = group.len().max(sub.len());
    let merged: Vec<String> = (0..width)
        .map(|i| {
            let s = super::cell(sub, i);
            let g = super::cell(group, i);
            if !s.is_empty() {
                s.to_string()
            } else if !g.is_empty() {
                g.to_string()
            } else {
                "Unknown".to_string()
            }
        })
        .collect();
    disambiguate(&merged)
}

/// Left to right: trim; an empty cell becomes `blank_{n}` (1-based over the
/// blanks seen so far in this row); a name already used earlier gets `_dup`,
/// and `_dup.{k}` on repeated collisions.
pub fn disambiguate(cells: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::with_capacity(cells.len());
    let mut blanks = 0usize;
    let mut out = Vec::with_capacity(cells.len());

    for cell in cells {
        let mut name = cell.trim().to_string();
        if name.is_empty() {
            blanks += 1;
            name = format!("blank_{blanks}");
        }
        if used.contains(&name) {
            name.push_str("_dup");
        }
        let stem = name.clone();
        let mut k = 1usize;
        while used.contains(&name) {
            k += 1;
            name = format!("{stem}.{k}");
        }
        used.insert(name.clone());
        out.push(name);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blank_and_duplicate_cells_get_distinct_names() {
        let names = disambiguate(&row(&["Map", "", "Map", "Result"]));
        assert_eq!(names, vec!["Map", "blank_1", "Map_dup", "Result"]);
    }

    #[test]
    fn disambiguation_is_deterministic_and_unique() {
        let input = row(&["Map", "Map", "Map", "", "", "blank_1"]);
        let a = disambiguate(&input);
        let b = disambiguate(&input);
        assert_eq!(a, b);
        let distinct: std::collections::HashSet<_> = a.iter().collect();
        assert_eq!(distinct.len(), a.len());
    }

    #[test]
    fn triple_collision_still_unique() {
        let names = disambiguate(&row(&["X", "X", "X"]));
        assert_eq!(names, vec!["X", "X_dup", "X_dup.2"]);
    }

    #[test]
    fn marker_search_finds_first_matching_row() {
        let rows = vec![
            row(&["Season overview", ""]),
            row(&["", "some note"]),
            row(&["  maps ", "Map Win%"]),
            row(&["Ascent", "70"]),
        ];
        let (idx, names) = resolve_header(&rows, HeaderHint::Marker("Maps")).unwrap();
        assert_eq!(idx, 2);
        assert_eq!(names, vec!["maps", "Map Win%"]);
    }

    #[test]
    fn marker_miss_is_header_not_found() {
        let rows = vec![row(&["a", "b"])];
        let err = resolve_header(&rows, HeaderHint::Marker("Maps")).unwrap_err();
        assert!(matches!(err, crate::SheetError::HeaderNotFound(_)));
    }

    #[test]
    fn fixed_row_past_end_is_header_not_found() {
        let rows = vec![row(&["a"])];
        let err = resolve_header(&rows, HeaderHint::Row(2)).unwrap_err();
        assert!(matches!(err, crate::SheetError::HeaderNotFound(_)));
    }

    #[test]
    fn two_row_merge_prefers_sub_label() {
        let group = row(&["Attack", "Attack", "", ""]);
        let sub = row(&["ATK W", "", "Map", ""]);
        let names = merge_header_rows(&group, &sub);
        assert_eq!(names, vec!["ATK W", "Attack", "Map", "Unknown"]);
    }

    #[test]
    fn two_row_merge_handles_ragged_rows() {
        let group = row(&["A", "B", "C"]);
        let sub = row(&["x"]);
        assert_eq!(merge_header_rows(&group, &sub), vec!["x", "B", "C"]);
    }
}
