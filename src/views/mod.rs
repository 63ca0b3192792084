// src/views/mod.rs
//
// One module per worksheet: each knows where its header lives, which field
// is required, and which columns coalesce, and turns a raw sheet into the
// clean table the presentation layer consumes.

pub mod comp_stats;
pub mod map_stats;
pub mod match_history;
pub mod player_stats;
