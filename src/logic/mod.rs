//! Tournament engine: scheduling, standings, brackets, results and points.

mod bracket;
mod points;
mod progress;
mod results;
mod schedule;
mod setup;
mod standings;

pub use bracket::{next_round, seed_playoffs, Advance, PlannedMatch};
pub use points::{finalize, final_placements, standings_view, PointsConfig, StandingsView};
pub use progress::{advance, ProgressEvent};
pub use results::{submit_result, ScoreSubmission, StatsLedger};
pub use schedule::{generate_knockout_first_round, generate_round_robin, generate_schedule};
pub use setup::{
    create_tournament, create_tournament_with_rng, pair_players, NewTournament,
    SUPPORTED_PLAYER_COUNTS,
};
pub use standings::{
    build_standings, compare_standings, group_standings, is_dead_heat, overall_standings,
    rank_standings,
};
