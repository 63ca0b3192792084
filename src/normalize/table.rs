// src/normalize/table.rs

use std::borrow::Cow;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::error::SheetError;

/// One spreadsheet value after normalization. `Null` marks a value that was
/// absent or nulled out by coercion; plain empty strings stay `Text("")`
/// until a stage decides otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Textual rendition: `Null` reads as empty.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Cell::Null => Cow::Borrowed(""),
            Cell::Text(s) => Cow::Borrowed(s.as_str()),
            Cell::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Null => true,
            Cell::Text(s) => s.is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Null => serializer.serialize_none(),
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

/// Per-column numeric coercion policy. `Strict` propagates parse failures;
/// `BestEffort` nulls them out so downstream sums stay well-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Strict,
    BestEffort,
}

/// A rectangular table: every row holds exactly one cell per header, in
/// header order. Built once from raw rows and only transformed into new
/// tables from there.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Build a table from resolved headers and the rows following them.
    ///
    /// Cells are trimmed, ragged rows padded (or truncated) to header arity.
    /// Columns with an empty resolved name are dropped, as are exact
    /// duplicate names past the first occurrence; both can only happen when
    /// the header resolver was bypassed for a fixed-row sheet. Rows whose
    /// `required` field is empty after trimming are filtered out; the
    /// remaining rows keep their relative order.
    pub fn from_rows(
        headers: &[String],
        data: &[Vec<String>],
        required: Option<&str>,
    ) -> Result<Table, SheetError> {
        // Which source columns survive: named, first occurrence of the name.
        let mut kept: Vec<(usize, String)> = Vec::with_capacity(headers.len());
        for (i, raw) in headers.iter().enumerate() {
            let name = raw.trim();
            if name.is_empty() || kept.iter().any(|(_, n)| n == name) {
                continue;
            }
            kept.push((i, name.to_string()));
        }

        let required_at = match required {
            Some(name) => Some(
                kept.iter()
                    .position(|(_, n)| n == name)
                    .ok_or_else(|| SheetError::RequiredColumnMissing(name.to_string()))?,
            ),
            None => None,
        };

        let mut rows = Vec::with_capacity(data.len());
        for raw in data {
            let row: Vec<Cell> = kept
                .iter()
                .map(|&(i, _)| Cell::Text(super::cell(raw, i).to_string()))
                .collect();
            if let Some(r) = required_at {
                if row[r].is_empty() {
                    continue;
                }
            }
            rows.push(row);
        }

        Ok(Table {
            headers: kept.into_iter().map(|(_, n)| n).collect(),
            rows,
        })
    }

    /// Assemble from already-shaped parts. Rows must match header arity.
    pub(crate) fn from_parts(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Table {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Table { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Exact-name column lookup.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Case-insensitive, trimmed lookup. Survives disambiguation renames:
    /// `find_column("maps")` still locates a column the resolver left as
    /// `Maps` or `maps `.
    pub fn find_column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(name))
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Cell> {
        let col = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[col])
    }

    pub fn column(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().map(move |r| &r[col]))
    }

    /// Rename a column in place. A no-op when `from` is absent.
    pub fn rename(&mut self, from: &str, to: &str) {
        if let Some(i) = self.column_index(from) {
            self.headers[i] = to.to_string();
        }
    }

    /// Coerce one column to numbers under the given policy. Empty cells
    /// become `Null` either way; only `Strict` turns an unparseable
    /// non-empty value into an error.
    pub fn coerce(&mut self, name: &str, policy: Coercion) -> Result<(), SheetError> {
        let col = match self.column_index(name) {
            Some(c) => c,
            None => return Ok(()),
        };
        for row in &mut self.rows {
            let cell = &mut row[col];
            let text = match cell {
                Cell::Text(s) => s.trim(),
                _ => continue,
            };
            *cell = if text.is_empty() {
                Cell::Null
            } else {
                match text.parse::<f64>() {
                    Ok(n) => Cell::Number(n),
                    Err(_) if policy == Coercion::BestEffort => Cell::Null,
                    Err(_) => {
                        return Err(SheetError::NumericParse {
                            column: name.to_string(),
                            value: text.to_string(),
                        })
                    }
                }
            };
        }
        Ok(())
    }

    /// Per-column independent coercion: a column converts only when every
    /// non-empty value parses (and at least one does). Columns with leftover
    /// text stay textual rather than erroring.
    pub fn auto_coerce(&mut self) {
        for col in 0..self.headers.len() {
            let mut any = false;
            let clean = self.rows.iter().all(|row| match &row[col] {
                Cell::Text(s) if !s.trim().is_empty() => {
                    any = true;
                    s.trim().parse::<f64>().is_ok()
                }
                _ => true,
            });
            if !clean || !any {
                continue;
            }
            for row in &mut self.rows {
                if let Cell::Text(s) = &row[col] {
                    let t = s.trim();
                    row[col] = if t.is_empty() {
                        Cell::Null
                    } else {
                        Cell::Number(t.parse().expect("checked above"))
                    };
                }
            }
        }
    }
}

/// Tables serialize as an array of records, one name → value map per row.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.rows.len()))?;
        for row in &self.rows {
            seq.serialize_element(&RecordRef {
                headers: &self.headers,
                row,
            })?;
        }
        seq.end()
    }
}

struct RecordRef<'a> {
    headers: &'a [String],
    row: &'a [Cell],
}

impl Serialize for RecordRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (name, cell) in self.headers.iter().zip(self.row) {
            map.serialize_entry(name, cell)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[&str]]) -> Vec<Vec<String>> {
        data.iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn pads_and_truncates_to_header_arity() {
        let t = Table::from_rows(
            &headers(&["a", "b"]),
            &rows(&[&["1"], &["2", "3", "4"]]),
            None,
        )
        .unwrap();
        assert_eq!(t.rows()[0], vec![Cell::Text("1".into()), Cell::Text("".into())]);
        assert_eq!(t.rows()[1], vec![Cell::Text("2".into()), Cell::Text("3".into())]);
    }

    #[test]
    fn drops_unnamed_and_duplicate_columns() {
        let t = Table::from_rows(
            &headers(&["a", "", "a", "b"]),
            &rows(&[&["1", "x", "shadowed", "2"]]),
            None,
        )
        .unwrap();
        assert_eq!(t.headers(), &["a", "b"]);
        assert_eq!(
            t.rows()[0],
            vec![Cell::Text("1".into()), Cell::Text("2".into())]
        );
    }

    #[test]
    fn required_filter_keeps_complement_in_order() {
        let t = Table::from_rows(
            &headers(&["Opponent", "Map"]),
            &rows(&[
                &["TeamA", "Ascent"],
                &["  ", "Bind"],
                &["TeamB", "Lotus"],
                &["", "Split"],
            ]),
            Some("Opponent"),
        )
        .unwrap();
        let opps: Vec<_> = t.column("Opponent").unwrap().map(|c| c.as_text().into_owned()).collect();
        assert_eq!(opps, vec!["TeamA", "TeamB"]);
    }

    #[test]
    fn missing_required_column_errors() {
        let err = Table::from_rows(&headers(&["Map"]), &rows(&[&["Ascent"]]), Some("Opponent"))
            .unwrap_err();
        assert!(matches!(err, SheetError::RequiredColumnMissing(_)));
    }

    #[test]
    fn strict_coercion_propagates_parse_failure() {
        let mut t = Table::from_rows(
            &headers(&["Won"]),
            &rows(&[&["3"], &["forfeit"]]),
            None,
        )
        .unwrap();
        let err = t.coerce("Won", Coercion::Strict).unwrap_err();
        assert!(matches!(err, SheetError::NumericParse { .. }));
    }

    #[test]
    fn best_effort_coercion_nulls_bad_values() {
        let mut t = Table::from_rows(
            &headers(&["Won"]),
            &rows(&[&["3"], &["forfeit"], &[""]]),
            None,
        )
        .unwrap();
        t.coerce("Won", Coercion::BestEffort).unwrap();
        let cells: Vec<_> = t.column("Won").unwrap().cloned().collect();
        assert_eq!(cells, vec![Cell::Number(3.0), Cell::Null, Cell::Null]);
    }

    #[test]
    fn auto_coerce_leaves_mixed_columns_textual() {
        let mut t = Table::from_rows(
            &headers(&["Maps", "Map Win%", "Notes"]),
            &rows(&[
                &["Ascent", "70.5", "ok"],
                &["Bind", "55", "see vod"],
                &["Lotus", "", "3"],
            ]),
            None,
        )
        .unwrap();
        t.auto_coerce();
        assert_eq!(t.get(0, "Map Win%"), Some(&Cell::Number(70.5)));
        assert_eq!(t.get(2, "Map Win%"), Some(&Cell::Null));
        // "Maps" is fully textual, "Notes" is mixed: both stay text.
        assert_eq!(t.get(0, "Maps"), Some(&Cell::Text("Ascent".into())));
        assert_eq!(t.get(2, "Notes"), Some(&Cell::Text("3".into())));
    }

    #[test]
    fn serializes_as_records() {
        let mut t = Table::from_rows(
            &headers(&["Maps", "Won"]),
            &rows(&[&["Ascent", "7"]]),
            None,
        )
        .unwrap();
        t.coerce("Won", Coercion::BestEffort).unwrap();
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{ "Maps": "Ascent", "Won": 7.0 }])
        );
    }
}
