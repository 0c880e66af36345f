//! Match record, sides, status and bracket slots.

use crate::models::player::PlayerId;
use crate::models::team::Team;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Most games one side can record in a set.
pub const MAX_GAMES_PER_SET: i32 = 99;

/// Which side of a match: team A (player1 + player2) or team B (player3 + player4).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    One,
    Two,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::One => Side::Two,
            Side::Two => Side::One,
        }
    }
}

/// Lifecycle of a single match.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

/// Which playoff bracket a semifinal feeds: places 1-4, 5-8 or 9-12.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Top,
    Middle,
    Bottom,
}

impl Tier {
    /// Best place decided inside this bracket.
    pub fn base_place(self) -> u32 {
        match self {
            Tier::Top => 1,
            Tier::Middle => 5,
            Tier::Bottom => 9,
        }
    }

    /// The two placement finals fed by this bracket's semifinals (winners, losers).
    pub fn finals(self) -> (BracketSlot, BracketSlot) {
        match self {
            Tier::Top => (BracketSlot::Final, BracketSlot::ThirdPlace),
            Tier::Middle => (BracketSlot::FifthPlace, BracketSlot::SeventhPlace),
            Tier::Bottom => (BracketSlot::NinthPlace, BracketSlot::EleventhPlace),
        }
    }
}

/// Role of a match inside the tournament structure.
///
/// Match numbers are for display and ordering only; everything that needs to know
/// "is this the final" asks the slot.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "tier")]
pub enum BracketSlot {
    /// Round-robin fixture (group stage or a pure round robin).
    GroupFixture,
    /// First round of a 6- or 12-team knockout; no continuation is defined.
    OpeningRound,
    QuarterFinal,
    SemiFinal(Tier),
    Final,
    ThirdPlace,
    FifthPlace,
    SeventhPlace,
    NinthPlace,
    EleventhPlace,
}

impl BracketSlot {
    /// `(winner place, loser place)` for placement finals; `None` for everything else.
    pub fn placing(self) -> Option<(u32, u32)> {
        let winner = match self {
            BracketSlot::Final => 1,
            BracketSlot::ThirdPlace => 3,
            BracketSlot::FifthPlace => 5,
            BracketSlot::SeventhPlace => 7,
            BracketSlot::NinthPlace => 9,
            BracketSlot::EleventhPlace => 11,
            _ => return None,
        };
        Some((winner, winner + 1))
    }

    pub fn is_placement_final(self) -> bool {
        self.placing().is_some()
    }
}

/// A single doubles match. Player 1 + 2 form side one, player 3 + 4 side two.
///
/// Only the first set is used by the current rule set (single, time-limited set);
/// sets 2 and 3 are kept so games still sum correctly if they are ever filled in.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub phase: u8,
    pub round_number: u32,
    pub match_number: u32,
    pub match_day: Option<u32>,
    pub group_number: Option<u32>,
    pub slot: BracketSlot,
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub player3: PlayerId,
    pub player4: PlayerId,
    pub set1_team1: Option<u32>,
    pub set1_team2: Option<u32>,
    pub set2_team1: Option<u32>,
    pub set2_team2: Option<u32>,
    pub set3_team1: Option<u32>,
    pub set3_team2: Option<u32>,
    /// Sets won by side one (1 for the winner of the single set, 0 otherwise).
    pub team1_score: u32,
    pub team2_score: u32,
    /// `None` while unplayed, and also for a completed tie.
    pub winner_team: Option<Side>,
    pub status: MatchStatus,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Match {
    /// Create a scheduled match between two teams.
    pub fn new(
        tournament_id: TournamentId,
        phase: u8,
        round_number: u32,
        match_number: u32,
        slot: BracketSlot,
        team_a: Team,
        team_b: Team,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            phase,
            round_number,
            match_number,
            match_day: None,
            group_number: None,
            slot,
            player1: team_a.player1,
            player2: team_a.player2,
            player3: team_b.player1,
            player4: team_b.player2,
            set1_team1: None,
            set1_team2: None,
            set2_team1: None,
            set2_team2: None,
            set3_team1: None,
            set3_team2: None,
            team1_score: 0,
            team2_score: 0,
            winner_team: None,
            status: MatchStatus::Scheduled,
            completed_at: None,
        }
    }

    pub fn with_day(mut self, match_day: u32) -> Self {
        self.match_day = Some(match_day);
        self
    }

    pub fn with_group(mut self, group_number: u32) -> Self {
        self.group_number = Some(group_number);
        self
    }

    pub fn team(&self, side: Side) -> Team {
        match side {
            Side::One => Team::new(self.player1, self.player2),
            Side::Two => Team::new(self.player3, self.player4),
        }
    }

    pub fn teams(&self) -> (Team, Team) {
        (self.team(Side::One), self.team(Side::Two))
    }

    pub fn players(&self) -> [PlayerId; 4] {
        [self.player1, self.player2, self.player3, self.player4]
    }

    pub fn side_of(&self, player: PlayerId) -> Option<Side> {
        if player == self.player1 || player == self.player2 {
            Some(Side::One)
        } else if player == self.player3 || player == self.player4 {
            Some(Side::Two)
        } else {
            None
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == MatchStatus::Completed
    }

    pub fn is_tie(&self) -> bool {
        self.is_completed() && self.winner_team.is_none()
    }

    /// Games won by a side, summed over all sets that have a score.
    pub fn games(&self, side: Side) -> u32 {
        let sets = match side {
            Side::One => [self.set1_team1, self.set2_team1, self.set3_team1],
            Side::Two => [self.set1_team2, self.set2_team2, self.set3_team2],
        };
        sets.iter().flatten().fold(0, |total: u32, g| total.saturating_add(*g))
    }

    pub fn sets(&self, side: Side) -> u32 {
        match side {
            Side::One => self.team1_score,
            Side::Two => self.team2_score,
        }
    }

    pub fn winner(&self) -> Option<Team> {
        self.winner_team.map(|s| self.team(s))
    }

    pub fn loser(&self) -> Option<Team> {
        self.winner_team.map(|s| self.team(s.other()))
    }
}
