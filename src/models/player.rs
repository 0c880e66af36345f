//! Player statistics, per-match stat records and per-tournament results.

use crate::models::error::TournamentError;
use crate::models::game::MatchId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches and lookups).
pub type PlayerId = Uuid;

/// How a match ended from one player's point of view.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Loss,
    Draw,
}

/// What one match contributed to one player's statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_id: MatchId,
    pub tournament_id: TournamentId,
    pub outcome: Outcome,
    pub games_for: u32,
    pub games_against: u32,
    pub recorded_at: DateTime<Utc>,
}

/// Cumulative statistics of a player across all tournaments.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player_id: PlayerId,
    pub total_matches: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_drawn: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u32,
    pub games_lost: u32,
    pub tournaments_played: u32,
    pub tournaments_won: u32,
    pub tournament_points: f64,
    /// Cached `matches_won / decisive matches * 100`.
    pub win_percentage: f64,
}

impl PlayerStats {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            ..Self::default()
        }
    }

    /// Apply (`multiplier = 1`) or withdraw (`multiplier = -1`) one match.
    ///
    /// Fails without changing anything if a counter would leave the `u32` range,
    /// e.g. when withdrawing a match that was never applied.
    pub fn apply_match(&mut self, record: &MatchRecord, multiplier: i32) -> Result<(), TournamentError> {
        let step = i64::from(multiplier);
        let mut next = self.clone();
        next.total_matches = self.shifted(self.total_matches, step)?;
        match record.outcome {
            Outcome::Win => {
                next.matches_won = self.shifted(self.matches_won, step)?;
                next.sets_won = self.shifted(self.sets_won, step)?;
            }
            Outcome::Loss => {
                next.matches_lost = self.shifted(self.matches_lost, step)?;
                next.sets_lost = self.shifted(self.sets_lost, step)?;
            }
            Outcome::Draw => {
                next.matches_drawn = self.shifted(self.matches_drawn, step)?;
            }
        }
        next.games_won = self.shifted(self.games_won, step * i64::from(record.games_for))?;
        next.games_lost = self.shifted(self.games_lost, step * i64::from(record.games_against))?;
        next.refresh_win_percentage();
        *self = next;
        Ok(())
    }

    /// Apply or withdraw a finished tournament's award.
    pub fn apply_award(&mut self, result: &TournamentResult, multiplier: i32) -> Result<(), TournamentError> {
        let step = i64::from(multiplier);
        let played = self.shifted(self.tournaments_played, step)?;
        let won = if result.position == 1 {
            self.shifted(self.tournaments_won, step)?
        } else {
            self.tournaments_won
        };
        self.tournaments_played = played;
        self.tournaments_won = won;
        self.tournament_points += f64::from(multiplier) * result.total_points;
        Ok(())
    }

    fn shifted(&self, value: u32, delta: i64) -> Result<u32, TournamentError> {
        i64::from(value)
            .checked_add(delta)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or(TournamentError::StatsOutOfRange(self.player_id))
    }

    pub fn decisive_matches(&self) -> u32 {
        self.total_matches.saturating_sub(self.matches_drawn)
    }

    fn refresh_win_percentage(&mut self) {
        let decisive = self.decisive_matches();
        self.win_percentage = if decisive == 0 {
            0.0
        } else {
            f64::from(self.matches_won) / f64::from(decisive) * 100.0
        };
    }
}

/// Final placement and points of one player in one finished tournament.
/// Keyed by `(tournament_id, player_id)`; recomputing replaces, never duplicates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentResult {
    pub tournament_id: TournamentId,
    pub player_id: PlayerId,
    pub position: u32,
    pub base_points: f64,
    /// Matches won in this tournament.
    pub bonus_points: f64,
    pub total_points: f64,
    pub awarded_at: DateTime<Utc>,
}
