// src/stats/mod.rs
//
// Aggregate numbers computed from the normalized tables. These mirror what
// the dashboard's cards and charts display, so the formulas (epsilon guards,
// weighting) are part of the contract, not presentation detail.

pub mod comp;
pub mod player;
