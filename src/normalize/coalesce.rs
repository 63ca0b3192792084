// src/normalize/coalesce.rs

use super::table::{Cell, Table};

/// Join separator for coalesced values.
const SEP: &str = " | ";

/// A named set of semantically-equivalent source columns, merged in declared
/// order into one derived column.
#[derive(Debug, Clone)]
pub struct ColumnGroup {
    pub target: String,
    pub sources: Vec<String>,
}

impl ColumnGroup {
    pub fn new(target: impl Into<String>, sources: Vec<String>) -> Self {
        ColumnGroup {
            target: target.into(),
            sources,
        }
    }
}

/// Merge the group's source columns into a single derived column appended at
/// the end, removing the sources. Row-wise: non-empty values only, declared
/// order, joined with `" | "`; all-empty rows derive an empty string. Source
/// names absent from the table are skipped.
pub fn coalesce(table: &Table, group: &ColumnGroup) -> Table {
    let source_cols: Vec<usize> = group
        .sources
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();

    let mut headers: Vec<String> = Vec::with_capacity(table.headers().len() + 1);
    let mut kept: Vec<usize> = Vec::with_capacity(table.headers().len());
    for (i, name) in table.headers().iter().enumerate() {
        if source_cols.contains(&i) {
            continue;
        }
        kept.push(i);
        headers.push(name.clone());
    }
    headers.push(group.target.clone());

    let rows = table
        .rows()
        .iter()
        .map(|row| {
            let mut out: Vec<Cell> = kept.iter().map(|&i| row[i].clone()).collect();
            let joined = source_cols
                .iter()
                .map(|&i| row[i].as_text())
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim().to_string())
                .collect::<Vec<_>>()
                .join(SEP);
            out.push(Cell::Text(joined));
            out
        })
        .collect();

    Table::from_parts(headers, rows)
}

/// Reorder and subset a table to the desired column list. Desired names not
/// present in the table are skipped without error; columns not desired are
/// dropped.
pub fn project(table: &Table, desired: &[&str]) -> Table {
    let cols: Vec<(usize, String)> = desired
        .iter()
        .filter_map(|name| table.column_index(name).map(|i| (i, name.to_string())))
        .collect();

    let rows = table
        .rows()
        .iter()
        .map(|row| cols.iter().map(|&(i, _)| row[i].clone()).collect())
        .collect();

    Table::from_parts(cols.into_iter().map(|(_, n)| n).collect(), rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], data: &[&[&str]]) -> Table {
        let h: Vec<String> = headers.iter().map(|s| s.to_string()).collect();
        let d: Vec<Vec<String>> = data
            .iter()
            .map(|r| r.iter().map(|s| s.to_string()).collect())
            .collect();
        Table::from_rows(&h, &d, None).unwrap()
    }

    fn group(target: &str, sources: &[&str]) -> ColumnGroup {
        ColumnGroup::new(target, sources.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn joins_non_empty_sources_in_declared_order() {
        let t = table(
            &["Opponent", "Roster Pink", "Roster Cyan", "Roster Mix"],
            &[
                &["A", "rus, solo", "jayloh", "slash"],
                &["B", "", "jfz", ""],
                &["C", "", "", ""],
            ],
        );
        let out = coalesce(&t, &group("Rosters", &["Roster Pink", "Roster Cyan", "Roster Mix"]));
        assert_eq!(out.headers(), &["Opponent", "Rosters"]);
        let rosters: Vec<_> = out
            .column("Rosters")
            .unwrap()
            .map(|c| c.as_text().into_owned())
            .collect();
        assert_eq!(rosters, vec!["rus, solo | jayloh | slash", "jfz", ""]);
    }

    #[test]
    fn single_non_empty_source_has_no_separator() {
        let t = table(&["x", "y"], &[&["", "only"]]);
        let out = coalesce(&t, &group("m", &["x", "y"]));
        assert_eq!(out.get(0, "m"), Some(&Cell::Text("only".into())));
    }

    #[test]
    fn missing_source_columns_are_skipped() {
        let t = table(&["a", "b"], &[&["1", "2"]]);
        let out = coalesce(&t, &group("m", &["b", "nope"]));
        assert_eq!(out.headers(), &["a", "m"]);
        assert_eq!(out.get(0, "m"), Some(&Cell::Text("2".into())));
    }

    #[test]
    fn projection_keeps_present_names_in_desired_order() {
        let t = table(&["b", "a", "c"], &[&["2", "1", "3"]]);
        let out = project(&t, &["a", "ghost", "b"]);
        assert_eq!(out.headers(), &["a", "b"]);
        assert_eq!(
            out.rows()[0],
            vec![Cell::Text("1".into()), Cell::Text("2".into())]
        );
    }
}
