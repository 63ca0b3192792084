// src/config.rs

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::normalize::PlayerBlock;

/// Runtime configuration, loaded from `scrimscraper.yaml` when present.
/// Defaults describe the team spreadsheet's current layout, so a bare
/// checkout only needs a spreadsheet id and an API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Google Sheets spreadsheet id (the long token in the sheet URL).
    pub spreadsheet_id: String,
    /// Directory the normalized tables are written into.
    pub out_dir: PathBuf,
    pub worksheets: Worksheets,
    /// Per-player column blocks of the scrim-stats worksheet, inclusive.
    pub players: Vec<PlayerBlock>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Worksheets {
    pub match_history: String,
    pub map_rates: String,
    pub comp_stats: String,
    pub scrim_stats: String,
}

impl Default for Worksheets {
    fn default() -> Self {
        Worksheets {
            match_history: "All Match History".into(),
            map_rates: "Map W/L Rate".into(),
            comp_stats: "Comp Stats".into(),
            scrim_stats: "Scrim Stats".into(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let block = |name: &str, start: usize, end: usize| PlayerBlock {
            name: name.into(),
            start,
            end,
        };
        Config {
            spreadsheet_id: String::new(),
            out_dir: PathBuf::from("tables"),
            worksheets: Worksheets::default(),
            players: vec![
                block("Rus", 14, 21),
                block("Solo", 22, 29),
                block("Jayloh", 30, 37),
                block("Slash", 38, 45),
                block("Jfz", 46, 53),
                block("Synzera", 54, 61),
            ],
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Config> {
        if path.exists() {
            Config::load(path)
        } else {
            info!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }
}
