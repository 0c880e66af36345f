//! Doubles team: a fixed pair of players.

use crate::models::player::PlayerId;
use serde::{Deserialize, Serialize};

/// Two players competing together for a whole tournament.
///
/// Display keeps `player1`/`player2` in the order given; identity ignores it, so
/// `Team::new(a, b)` and `Team::new(b, a)` compare equal.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Team {
    pub player1: PlayerId,
    pub player2: PlayerId,
}

impl Team {
    pub fn new(player1: PlayerId, player2: PlayerId) -> Self {
        Self { player1, player2 }
    }

    /// Order-independent identity of the pair.
    pub fn key(&self) -> (PlayerId, PlayerId) {
        if self.player1 <= self.player2 {
            (self.player1, self.player2)
        } else {
            (self.player2, self.player1)
        }
    }

    pub fn contains(&self, player: PlayerId) -> bool {
        self.player1 == player || self.player2 == player
    }

    pub fn players(&self) -> [PlayerId; 2] {
        [self.player1, self.player2]
    }
}

impl PartialEq for Team {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Team {}

impl std::hash::Hash for Team {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}
