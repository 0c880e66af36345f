//! Doubles tournament engine: library with models and business logic.

pub mod config;
pub mod logic;
pub mod models;

pub use config::ServerConfig;
pub use logic::{
    advance, build_standings, compare_standings, create_tournament, create_tournament_with_rng,
    final_placements, finalize, generate_knockout_first_round, generate_round_robin,
    generate_schedule, group_standings, is_dead_heat, next_round, overall_standings, pair_players,
    rank_standings, seed_playoffs, standings_view, submit_result, Advance, NewTournament,
    PlannedMatch, PointsConfig, ProgressEvent, ScoreSubmission, StandingsView, StatsLedger,
    SUPPORTED_PLAYER_COUNTS,
};
pub use models::{
    BracketSlot, Category, Match, MatchId, MatchRecord, MatchStatus, Outcome, Placement, PlayerId,
    PlayerStats, PointsTable, Side, Team, TeamStanding, Tier, TieRule, Tournament,
    TournamentError, TournamentId, TournamentResult, TournamentStatus, TournamentType,
    MAX_GAMES_PER_SET,
};
