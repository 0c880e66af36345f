//! Data structures for doubles tournaments: teams, matches, standings, stats.

mod error;
mod game;
mod player;
mod standing;
mod team;
mod tournament;

pub use error::{TieRule, TournamentError};
pub use game::{BracketSlot, Match, MatchId, MatchStatus, Side, Tier, MAX_GAMES_PER_SET};
pub use player::{MatchRecord, Outcome, PlayerId, PlayerStats, TournamentResult};
pub use standing::{Placement, TeamStanding};
pub use team::Team;
pub use tournament::{
    Category, PointsTable, Tournament, TournamentId, TournamentStatus, TournamentType,
};
