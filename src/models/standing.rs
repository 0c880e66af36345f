//! Derived per-team standings (rebuilt from completed matches, never stored).

use crate::models::team::Team;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: Team,
    pub group_number: Option<u32>,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_drawn: u32,
    pub sets_won: u32,
    pub sets_lost: u32,
    pub games_won: u64,
    pub games_lost: u64,
    /// 2 per win, 1 per draw.
    pub points: u32,
}

impl TeamStanding {
    pub fn new(team: Team, group_number: Option<u32>) -> Self {
        Self {
            team,
            group_number,
            matches_played: 0,
            matches_won: 0,
            matches_lost: 0,
            matches_drawn: 0,
            sets_won: 0,
            sets_lost: 0,
            games_won: 0,
            games_lost: 0,
            points: 0,
        }
    }

    pub fn set_difference(&self) -> i64 {
        i64::from(self.sets_won) - i64::from(self.sets_lost)
    }

    pub fn game_difference(&self) -> i64 {
        self.games_won as i64 - self.games_lost as i64
    }
}

/// One team's final placing in a finished tournament.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub team: Team,
    pub position: u32,
}
