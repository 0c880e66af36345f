//! Tournament record, format and lifecycle status.

use crate::models::error::TournamentError;
use crate::models::game::{Match, MatchId, MatchStatus};
use crate::models::team::Team;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Points per final position, e.g. `{1: 7.5, 2: 5.0}`.
pub type PointsTable = BTreeMap<u32, f64>;

/// Tournament format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentType {
    RoundRobin,
    Knockout,
    GroupStageKnockout,
}

impl TournamentType {
    pub fn max_phases(self) -> u8 {
        match self {
            TournamentType::RoundRobin | TournamentType::Knockout => 1,
            TournamentType::GroupStageKnockout => 2,
        }
    }
}

impl std::fmt::Display for TournamentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentType::RoundRobin => write!(f, "round robin"),
            TournamentType::Knockout => write!(f, "knockout"),
            TournamentType::GroupStageKnockout => write!(f, "group stage knockout"),
        }
    }
}

/// Where the tournament is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    /// Schedule generated, nothing played yet.
    #[default]
    Created,
    InProgress,
    /// Group stage done and playoffs drawn, no playoff match played yet.
    #[serde(rename = "PHASE_1_COMPLETE")]
    Phase1Complete,
    Finished,
}

/// Ranking category; selects the points table (e.g. `OPEN_250`).
#[derive(Clone, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub const OPEN_250: &'static str = "OPEN_250";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::new(Self::OPEN_250)
    }
}

/// Full tournament state: teams in seeding order, every generated match, and phase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    #[serde(rename = "type")]
    pub tournament_type: TournamentType,
    pub category: Category,
    /// Only meaningful in phase 1 of non-knockout formats.
    pub allow_ties: bool,
    pub current_phase: u8,
    pub max_phases: u8,
    pub status: TournamentStatus,
    /// Seeding order; fixed once the tournament is created.
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
    /// Replaces the category table when set.
    pub points_override: Option<PointsTable>,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Tournament {
    /// Create a tournament with no matches yet.
    pub fn new(
        name: impl Into<String>,
        tournament_type: TournamentType,
        category: Category,
        allow_ties: bool,
        teams: Vec<Team>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            tournament_type,
            category,
            allow_ties,
            current_phase: 1,
            max_phases: tournament_type.max_phases(),
            status: TournamentStatus::Created,
            teams,
            matches: Vec::new(),
            points_override: None,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn get_match(&self, id: MatchId) -> Result<&Match, TournamentError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn get_match_mut(&mut self, id: MatchId) -> Result<&mut Match, TournamentError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn has_match(&self, id: MatchId) -> bool {
        self.matches.iter().any(|m| m.id == id)
    }

    /// Matches of one phase, in match-number order.
    pub fn phase_matches(&self, phase: u8) -> Vec<&Match> {
        let mut ms: Vec<&Match> = self.matches.iter().filter(|m| m.phase == phase).collect();
        ms.sort_by_key(|m| m.match_number);
        ms
    }

    /// Matches of one round, in match-number order.
    pub fn round_matches(&self, phase: u8, round: u32) -> Vec<&Match> {
        let mut ms: Vec<&Match> = self
            .matches
            .iter()
            .filter(|m| m.phase == phase && m.round_number == round)
            .collect();
        ms.sort_by_key(|m| m.match_number);
        ms
    }

    /// A round is complete iff it has matches and all of them are completed.
    pub fn is_round_complete(&self, phase: u8, round: u32) -> bool {
        let ms = self.round_matches(phase, round);
        !ms.is_empty() && ms.iter().all(|m| m.is_completed())
    }

    pub fn is_phase_complete(&self, phase: u8) -> bool {
        let ms = self.phase_matches(phase);
        !ms.is_empty() && ms.iter().all(|m| m.is_completed())
    }

    pub fn all_matches_complete(&self) -> bool {
        !self.matches.is_empty() && self.matches.iter().all(|m| m.is_completed())
    }

    pub fn completed_matches(&self) -> impl Iterator<Item = &Match> {
        self.matches.iter().filter(|m| m.is_completed())
    }

    /// Highest match number used in a phase (0 when the phase has no matches).
    pub fn last_match_number(&self, phase: u8) -> u32 {
        self.matches
            .iter()
            .filter(|m| m.phase == phase)
            .map(|m| m.match_number)
            .max()
            .unwrap_or(0)
    }

    /// Cancel a match that has not been played. Cancelled matches never complete,
    /// so their round stays open.
    pub fn cancel_match(&mut self, id: MatchId) -> Result<(), TournamentError> {
        let m = self.get_match_mut(id)?;
        match m.status {
            MatchStatus::Scheduled | MatchStatus::InProgress => {
                m.status = MatchStatus::Cancelled;
                log::info!("Match {} (round {}, #{}) cancelled", id, m.round_number, m.match_number);
                Ok(())
            }
            MatchStatus::Completed => Err(TournamentError::MatchAlreadyPlayed(id)),
            MatchStatus::Cancelled => Err(TournamentError::MatchCancelled(id)),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.status == TournamentStatus::Finished
    }
}
