use std::collections::BTreeMap;
use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use scrimscraper::{
    cache::SheetCache,
    config::Config,
    emit::{self, ManifestEntry},
    fetch::SheetClient,
    stats, views, RawSheet, SheetError,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) config + credentials ─────────────────────────────────────
    let config = Config::load_or_default(Path::new("scrimscraper.yaml"))?;
    if config.spreadsheet_id.is_empty() {
        anyhow::bail!("spreadsheet_id is not set; add it to scrimscraper.yaml");
    }
    let api_key = env::var("SHEETS_API_KEY").context("SHEETS_API_KEY must be set")?;
    let client = SheetClient::new(api_key);

    // One fetch per worksheet per run; every view goes through the cache.
    let cache = SheetCache::new();
    let fetch = |worksheet: &str| -> Result<Arc<RawSheet>, SheetError> {
        cache.get_or_fetch(&client, &config.spreadsheet_id, worksheet)
    };

    let mut manifest: Vec<ManifestEntry> = Vec::new();

    // ─── 3) match history ────────────────────────────────────────────
    // A failing view halts that view only; the rest of the run continues.
    match fetch(&config.worksheets.match_history)
        .map_err(anyhow::Error::from)
        .and_then(|sheet| Ok(views::match_history::load(&sheet)?))
    {
        Ok(table) => {
            info!(rows = table.len(), "match history normalized");
            emit::write_json(&config.out_dir, "match_history", &table)?;
            manifest.push(ManifestEntry {
                table: "match_history".into(),
                rows: table.len(),
            });
        }
        Err(err) => error!(%err, "match history view failed"),
    }

    // ─── 4) map performance ──────────────────────────────────────────
    match fetch(&config.worksheets.map_rates)
        .map_err(anyhow::Error::from)
        .and_then(|sheet| Ok(views::map_stats::load(&sheet)?))
    {
        Ok(table) => {
            info!(rows = table.len(), "map performance normalized");
            emit::write_json(&config.out_dir, "map_stats", &table)?;
            manifest.push(ManifestEntry {
                table: "map_stats".into(),
                rows: table.len(),
            });
        }
        Err(err) => error!(%err, "map performance view failed"),
    }

    // ─── 5) compositions ─────────────────────────────────────────────
    match fetch(&config.worksheets.comp_stats)
        .map_err(anyhow::Error::from)
        .and_then(|sheet| Ok(views::comp_stats::load(&sheet)?))
    {
        Ok(table) => {
            let breakdown = stats::comp::breakdown(&table);
            info!(
                rows = table.len(),
                maps = breakdown.len(),
                "compositions normalized"
            );
            emit::write_json(&config.out_dir, "comp_stats", &table)?;
            emit::write_json(&config.out_dir, "comp_breakdown", &breakdown)?;
            manifest.push(ManifestEntry {
                table: "comp_stats".into(),
                rows: table.len(),
            });
            manifest.push(ManifestEntry {
                table: "comp_breakdown".into(),
                rows: breakdown.len(),
            });
        }
        Err(err) => error!(%err, "composition view failed"),
    }

    // ─── 6) player blocks ────────────────────────────────────────────
    match fetch(&config.worksheets.scrim_stats) {
        Ok(sheet) => match views::player_stats::load(&sheet, &config.players) {
            Some(table) => {
                let metrics = stats::player::all_metrics(&table);
                let agents: BTreeMap<String, _> = stats::player::player_names(&table)
                    .into_iter()
                    .map(|p| {
                        let usage = stats::player::agent_usage(&table, &p);
                        (p, usage)
                    })
                    .collect();
                info!(
                    rows = table.len(),
                    players = metrics.len(),
                    "player stats normalized"
                );
                emit::write_json(&config.out_dir, "player_stats", &table)?;
                emit::write_json(&config.out_dir, "player_metrics", &metrics)?;
                emit::write_json(&config.out_dir, "player_agents", &agents)?;
                manifest.push(ManifestEntry {
                    table: "player_stats".into(),
                    rows: table.len(),
                });
                manifest.push(ManifestEntry {
                    table: "player_metrics".into(),
                    rows: metrics.len(),
                });
                manifest.push(ManifestEntry {
                    table: "player_agents".into(),
                    rows: agents.len(),
                });
            }
            // Not an error: the consumer shows an empty state instead.
            None => warn!("every player block is empty, nothing to emit"),
        },
        Err(err) => error!(%err, "scrim stats fetch failed"),
    }

    // ─── 7) manifest ─────────────────────────────────────────────────
    if manifest.is_empty() {
        warn!("no view produced a table this run");
    }
    emit::write_manifest(&config.out_dir, manifest)?;
    info!("all done");
    Ok(())
}
