// src/stats/comp.rs

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::warn;

use crate::normalize::{Cell, Table};

/// Guards the side win-rate denominators against compositions that never
/// played one side.
const EPS: f64 = 1e-9;

const WIN_RATE_WEIGHT: f64 = 0.7;
const PRESENCE_WEIGHT: f64 = 0.3;

/// Per-map record of one composition.
#[derive(Debug, Clone, Serialize)]
pub struct CompStat {
    pub comp: String,
    pub games: usize,
    pub wins: usize,
    pub losses: usize,
    pub ties: usize,
    pub atk_won: f64,
    pub atk_lost: f64,
    pub def_won: f64,
    pub def_lost: f64,
    /// Percent of games won.
    pub win_rate: f64,
    /// Percent of attack rounds won, against attack rounds decided.
    pub atk_win_rate: f64,
    pub def_win_rate: f64,
    /// `atk_win_rate - def_win_rate`, positive for attack-sided comps.
    pub side_bias: f64,
    pub round_diff: f64,
    /// `0.7 · win_rate + 0.3 · pick_rate`; rewards comps that both win and
    /// actually get played.
    pub strength_score: f64,
    /// Percent of the map's games this comp was picked for.
    pub pick_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentCount {
    pub agent: String,
    pub count: usize,
}

/// Everything the composition page shows for one map.
#[derive(Debug, Clone, Serialize)]
pub struct MapBreakdown {
    pub map: String,
    pub compositions: Vec<CompStat>,
    pub agents: Vec<AgentCount>,
}

fn num(cell: &Cell) -> f64 {
    cell.number().unwrap_or(0.0)
}

/// Distinct non-empty map names, sorted.
pub fn map_names(table: &Table) -> Vec<String> {
    let Some(col) = table.column("Map") else {
        return Vec::new();
    };
    let mut names: Vec<String> = col
        .map(|c| c.as_text().trim().to_string())
        .filter(|m| !m.is_empty())
        .collect();
    names.sort();
    names.dedup();
    names
}

#[derive(Default)]
struct Acc {
    games: usize,
    wins: usize,
    losses: usize,
    ties: usize,
    atk_won: f64,
    atk_lost: f64,
    def_won: f64,
    def_lost: f64,
}

/// Group the normalized comp table's rows for one map by composition and
/// derive the record for each. Sorted by win rate descending (comp name
/// breaking ties) to match the page's ordering.
pub fn for_map(table: &Table, map: &str) -> Vec<CompStat> {
    let cols: Option<(usize, usize, usize)> = (|| {
        Some((
            table.column_index("Map")?,
            table.column_index("Comp")?,
            table.column_index("Result")?,
        ))
    })();
    let Some((map_col, comp_col, result_col)) = cols else {
        warn!(map, "comp table lacks Map/Comp/Result columns");
        return Vec::new();
    };
    let counters = ["ATK W", "ATK L", "DEF W", "DEF L"].map(|n| table.column_index(n));

    let mut groups: BTreeMap<String, Acc> = BTreeMap::new();
    let mut map_games = 0usize;
    for row in table.rows() {
        if row[map_col].as_text().trim() != map {
            continue;
        }
        map_games += 1;
        let acc = groups
            .entry(row[comp_col].as_text().into_owned())
            .or_default();
        acc.games += 1;
        match row[result_col].as_text().trim() {
            "Win" => acc.wins += 1,
            "Loss" => acc.losses += 1,
            "Tie" => acc.ties += 1,
            _ => {}
        }
        let take = |i: usize| counters[i].map(|c| num(&row[c])).unwrap_or(0.0);
        acc.atk_won += take(0);
        acc.atk_lost += take(1);
        acc.def_won += take(2);
        acc.def_lost += take(3);
    }

    let mut stats: Vec<CompStat> = groups
        .into_iter()
        .map(|(comp, acc)| {
            let games = acc.games as f64;
            let win_rate = acc.wins as f64 / games * 100.0;
            let atk_win_rate = acc.atk_won / (acc.atk_won + acc.atk_lost + EPS) * 100.0;
            let def_win_rate = acc.def_won / (acc.def_won + acc.def_lost + EPS) * 100.0;
            let pick_rate = games / map_games as f64 * 100.0;
            CompStat {
                comp,
                games: acc.games,
                wins: acc.wins,
                losses: acc.losses,
                ties: acc.ties,
                atk_won: acc.atk_won,
                atk_lost: acc.atk_lost,
                def_won: acc.def_won,
                def_lost: acc.def_lost,
                win_rate,
                atk_win_rate,
                def_win_rate,
                side_bias: atk_win_rate - def_win_rate,
                round_diff: (acc.atk_won + acc.def_won) - (acc.atk_lost + acc.def_lost),
                strength_score: win_rate * WIN_RATE_WEIGHT + pick_rate * PRESENCE_WEIGHT,
                pick_rate,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.win_rate
            .partial_cmp(&a.win_rate)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.comp.cmp(&b.comp))
    });
    stats
}

/// How often each agent shows up in the map's comp strings, most frequent
/// first.
pub fn agent_frequency(table: &Table, map: &str) -> Vec<AgentCount> {
    let (Some(map_col), Some(comp_col)) = (table.column_index("Map"), table.column_index("Comp"))
    else {
        return Vec::new();
    };

    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for row in table.rows() {
        if row[map_col].as_text().trim() != map {
            continue;
        }
        for agent in row[comp_col].as_text().split('|') {
            let agent = agent.trim();
            if !agent.is_empty() {
                *counts.entry(agent.to_string()).or_default() += 1;
            }
        }
    }

    let mut freq: Vec<AgentCount> = counts
        .into_iter()
        .map(|(agent, count)| AgentCount { agent, count })
        .collect();
    freq.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.agent.cmp(&b.agent)));
    freq
}

/// Full per-map breakdown for every map present in the table.
pub fn breakdown(table: &Table) -> Vec<MapBreakdown> {
    map_names(table)
        .into_iter()
        .map(|map| MapBreakdown {
            compositions: for_map(table, &map),
            agents: agent_frequency(table, &map),
            map,
        })
        .collect()
}
