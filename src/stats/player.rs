// src/stats/player.rs

use std::collections::BTreeMap;

use serde::Serialize;

use crate::normalize::{Cell, Table};
use crate::stats::comp::AgentCount;

/// Scrims are not round-scored in the sheet, so rounds are estimated at a
/// flat 24 per scrim.
pub const ROUNDS_PER_SCRIM: f64 = 24.0;

/// Per-player rate metrics derived from the stitched scrim-stats table.
#[derive(Debug, Clone, Serialize)]
pub struct PlayerMetrics {
    pub player: String,
    pub scrims: usize,
    pub rounds: f64,
    /// Mean combat score over scrims where it was recorded; `None` when it
    /// never was.
    pub acs: Option<f64>,
    pub kills_per_round: f64,
    pub first_kills_per_round: f64,
    pub kills_assists_per_round: f64,
}

/// Reference numbers for one role at pro level.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Benchmark {
    pub acs: f64,
    pub kills_per_round: f64,
    pub first_kills_per_round: f64,
    pub kills_assists_per_round: f64,
}

static VCT_BENCHMARKS: &[(&str, Benchmark)] = &[
    (
        "controller",
        Benchmark {
            acs: 199.0,
            kills_per_round: 0.70,
            first_kills_per_round: 0.10,
            kills_assists_per_round: 0.92,
        },
    ),
    (
        "duelist",
        Benchmark {
            acs: 232.0,
            kills_per_round: 0.83,
            first_kills_per_round: 0.18,
            kills_assists_per_round: 1.05,
        },
    ),
    (
        "initiator",
        Benchmark {
            acs: 209.0,
            kills_per_round: 0.74,
            first_kills_per_round: 0.11,
            kills_assists_per_round: 1.06,
        },
    ),
    (
        "sentinel",
        Benchmark {
            acs: 183.0,
            kills_per_round: 0.63,
            first_kills_per_round: 0.08,
            kills_assists_per_round: 0.78,
        },
    ),
];

pub fn benchmark(role: &str) -> Option<Benchmark> {
    VCT_BENCHMARKS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(role.trim()))
        .map(|(_, b)| *b)
}

/// Player metrics normalized against a role benchmark: 1.0 means exactly at
/// pro level. A missing player value (or a zero benchmark) pins the ratio
/// to zero rather than erroring.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkRatios {
    pub acs: f64,
    pub kills_per_round: f64,
    pub first_kills_per_round: f64,
    pub kills_assists_per_round: f64,
}

pub fn against_benchmark(metrics: &PlayerMetrics, bench: &Benchmark) -> BenchmarkRatios {
    fn ratio(player: f64, bench: f64) -> f64 {
        if bench == 0.0 || !player.is_finite() {
            0.0
        } else {
            player / bench
        }
    }
    BenchmarkRatios {
        acs: ratio(metrics.acs.unwrap_or(0.0), bench.acs),
        kills_per_round: ratio(metrics.kills_per_round, bench.kills_per_round),
        first_kills_per_round: ratio(metrics.first_kills_per_round, bench.first_kills_per_round),
        kills_assists_per_round: ratio(
            metrics.kills_assists_per_round,
            bench.kills_assists_per_round,
        ),
    }
}

/// Distinct player names in the stitched table, sorted.
pub fn player_names(table: &Table) -> Vec<String> {
    let Some(col) = table.column("Player") else {
        return Vec::new();
    };
    let mut names: Vec<String> = col
        .map(|c| c.as_text().trim().to_string())
        .filter(|p| !p.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}

fn column_sum(table: &Table, name: &str, rows: &[usize]) -> f64 {
    let Some(col) = table.column_index(name) else {
        return 0.0;
    };
    rows.iter()
        .map(|&r| table.rows()[r][col].number().unwrap_or(0.0))
        .sum()
}

fn column_mean(table: &Table, name: &str, rows: &[usize]) -> Option<f64> {
    let col = table.column_index(name)?;
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|&r| table.rows()[r][col].number())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Derive one player's rate metrics, or `None` when the table holds no rows
/// for them.
pub fn metrics_for(table: &Table, player: &str) -> Option<PlayerMetrics> {
    let player_col = table.column_index("Player")?;
    let rows: Vec<usize> = table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| matches!(&row[player_col], Cell::Text(p) if p == player))
        .map(|(i, _)| i)
        .collect();
    if rows.is_empty() {
        return None;
    }

    let scrims = rows.len();
    let rounds = scrims as f64 * ROUNDS_PER_SCRIM;
    let kills = column_sum(table, "Kills", &rows);
    let assists = column_sum(table, "Assists", &rows);
    let first_kills = column_sum(table, "FK", &rows);

    Some(PlayerMetrics {
        player: player.to_string(),
        scrims,
        rounds,
        acs: column_mean(table, "ACS", &rows),
        kills_per_round: kills / rounds,
        first_kills_per_round: first_kills / rounds,
        kills_assists_per_round: (kills + assists) / rounds,
    })
}

pub fn all_metrics(table: &Table) -> Vec<PlayerMetrics> {
    player_names(table)
        .iter()
        .filter_map(|p| metrics_for(table, p))
        .collect()
}

/// How often the player logged each agent, most played first. The agent
/// column is located case-insensitively because older sheet revisions label
/// it `Agent Played`.
pub fn agent_usage(table: &Table, player: &str) -> Vec<AgentCount> {
    let agent_col = table
        .find_column("Agent")
        .or_else(|| table.find_column("Agent Played"));
    let (Some(agent_col), Some(player_col)) = (agent_col, table.column_index("Player")) else {
        return Vec::new();
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in table.rows() {
        if row[player_col].as_text() != player {
            continue;
        }
        let agent = row[agent_col].as_text().trim().to_string();
        if !agent.is_empty() {
            *counts.entry(agent).or_default() += 1;
        }
    }

    let mut usage: Vec<AgentCount> = counts
        .into_iter()
        .map(|(agent, count)| AgentCount { agent, count })
        .collect();
    usage.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.agent.cmp(&b.agent)));
    usage
}
