//! Errors that can occur during tournament operations.

use crate::models::game::{MatchId, MAX_GAMES_PER_SET};
use crate::models::player::PlayerId;
use crate::models::tournament::{TournamentId, TournamentType};
use serde::Serialize;
use thiserror::Error;

/// Which rule rejected a tied score.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieRule {
    /// The tournament was created with `allow_ties = false`.
    TournamentDisallowsTies,
    /// Ties are only possible in phase 1.
    PlayoffPhase,
    /// Knockout tournaments never allow ties.
    KnockoutFormat,
}

impl std::fmt::Display for TieRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieRule::TournamentDisallowsTies => write!(f, "This tournament does not allow ties"),
            TieRule::PlayoffPhase => write!(f, "Ties are not allowed in the playoff phase"),
            TieRule::KnockoutFormat => write!(f, "Ties are not allowed in knockout tournaments"),
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum TournamentError {
    /// A submitted score was negative or above the games a set can hold.
    #[error(
        "Scores must be between 0 and {max} games (got {team1_score}-{team2_score})",
        max = MAX_GAMES_PER_SET
    )]
    InvalidScore { team1_score: i32, team2_score: i32 },

    #[error("{0}")]
    TieNotAllowed(TieRule),

    /// The schedule generator has no table for this many teams.
    #[error("{}", unsupported_team_count(.format, .count))]
    UnsupportedTeamCount { format: TournamentType, count: usize },

    /// Tournament creation accepts 8, 12, 16 or 24 players.
    #[error("Unsupported player count: {0} (expected 8, 12, 16 or 24)")]
    UnsupportedPlayerCount(usize),

    #[error("Player {0} appears more than once")]
    DuplicatePlayer(PlayerId),

    /// Internal invariant: a correction tried to withdraw stats that were never recorded.
    #[error("Cannot reverse statistics for player {0}: no stats recorded")]
    ReverseNonexistentStats(PlayerId),

    /// Internal invariant: a stat counter would drop below zero or overflow.
    #[error("Statistics for player {0} would go out of range")]
    StatsOutOfRange(PlayerId),

    #[error("Match {0} not found")]
    MatchNotFound(MatchId),

    #[error("Tournament {0} not found")]
    TournamentNotFound(TournamentId),

    #[error("Match {0} is cancelled")]
    MatchCancelled(MatchId),

    #[error("Match {0} has already been played")]
    MatchAlreadyPlayed(MatchId),

    /// Round data does not have the shape the bracket advancer expects.
    #[error("Malformed bracket: {0}")]
    MalformedBracket(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

fn unsupported_team_count(format: &TournamentType, count: &usize) -> String {
    match *format {
        TournamentType::Knockout => format!("Unsupported team count for knockout: {}", count),
        _ => format!("Unsupported team count: {}", count),
    }
}
