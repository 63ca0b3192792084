// src/emit.rs

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

/// One emitted table as the manifest records it.
#[derive(Debug, Serialize)]
pub struct ManifestEntry {
    pub table: String,
    pub rows: usize,
}

#[derive(Debug, Serialize)]
struct Manifest {
    generated_at: DateTime<Utc>,
    tables: Vec<ManifestEntry>,
}

/// Write `value` as pretty JSON to `<out_dir>/<name>.json`. Writes go to a
/// `.tmp` sibling first and are renamed into place, so a crash mid-write
/// never leaves a consumer reading half a table.
pub fn write_json<T: Serialize>(out_dir: &Path, name: &str, value: &T) -> Result<PathBuf> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let final_path = out_dir.join(format!("{name}.json"));
    let tmp_path = out_dir.join(format!("{name}.json.tmp"));

    let file = File::create(&tmp_path)
        .with_context(|| format!("creating {}", tmp_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), value)
        .with_context(|| format!("serializing `{name}`"))?;
    fs::rename(&tmp_path, &final_path).with_context(|| {
        format!(
            "renaming {} to {}",
            tmp_path.display(),
            final_path.display()
        )
    })?;

    info!(table = name, path = %final_path.display(), "wrote table");
    Ok(final_path)
}

/// Record what this run produced.
pub fn write_manifest(out_dir: &Path, tables: Vec<ManifestEntry>) -> Result<PathBuf> {
    let manifest = Manifest {
        generated_at: Utc::now(),
        tables,
    };
    write_json(out_dir, "manifest", &manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::{Coercion, Table};

    #[test]
    fn table_round_trips_through_json_file() -> Result<()> {
        let dir = tempfile::tempdir()?;

        let headers: Vec<String> = ["Maps", "Won"].iter().map(|s| s.to_string()).collect();
        let data: Vec<Vec<String>> = vec![vec!["Ascent".into(), "7".into()]];
        let mut table = Table::from_rows(&headers, &data, None).unwrap();
        table.coerce("Won", Coercion::BestEffort).unwrap();

        let path = write_json(dir.path(), "map_stats", &table)?;
        assert_eq!(path, dir.path().join("map_stats.json"));
        assert!(!dir.path().join("map_stats.json.tmp").exists());

        let text = fs::read_to_string(&path)?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        assert_eq!(value, serde_json::json!([{ "Maps": "Ascent", "Won": 7.0 }]));
        Ok(())
    }

    #[test]
    fn manifest_lists_every_table() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = write_manifest(
            dir.path(),
            vec![
                ManifestEntry {
                    table: "match_history".into(),
                    rows: 42,
                },
                ManifestEntry {
                    table: "map_stats".into(),
                    rows: 7,
                },
            ],
        )?;

        let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(path)?)?;
        assert_eq!(value["tables"][0]["table"], "match_history");
        assert_eq!(value["tables"][1]["rows"], 7);
        assert!(value["generated_at"].is_string());
        Ok(())
    }
}
