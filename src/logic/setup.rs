//! Tournament creation: validate the player list, form teams, generate the schedule.

use crate::logic::schedule::generate_schedule;
use crate::models::{
    Category, PlayerId, PointsTable, Team, Tournament, TournamentError, TournamentType,
};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashSet;

/// Player counts a tournament can be created with (4, 6, 8 or 12 teams).
pub const SUPPORTED_PLAYER_COUNTS: [usize; 4] = [8, 12, 16, 24];

/// Request to create a tournament. Players are paired in order: 1+2, 3+4, ...
/// and the resulting team order is the seeding.
#[derive(Clone, Debug, Deserialize)]
pub struct NewTournament {
    pub name: String,
    #[serde(rename = "type")]
    pub tournament_type: TournamentType,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub allow_ties: bool,
    pub players: Vec<PlayerId>,
    /// Draw teams at random instead of pairing in the given order.
    #[serde(default)]
    pub shuffle_teams: bool,
    #[serde(default)]
    pub points_override: Option<PointsTable>,
}

/// Pair consecutive players into teams.
pub fn pair_players(players: &[PlayerId]) -> Vec<Team> {
    players
        .chunks_exact(2)
        .map(|pair| Team::new(pair[0], pair[1]))
        .collect()
}

/// Create a tournament and its opening schedule.
pub fn create_tournament(request: NewTournament) -> Result<Tournament, TournamentError> {
    create_tournament_with_rng(request, &mut rand::thread_rng())
}

/// As [`create_tournament`], drawing teams with the given RNG when `shuffle_teams` is set.
pub fn create_tournament_with_rng<R: Rng + ?Sized>(
    request: NewTournament,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let NewTournament {
        name,
        tournament_type,
        category,
        allow_ties,
        mut players,
        shuffle_teams,
        points_override,
    } = request;

    if !SUPPORTED_PLAYER_COUNTS.contains(&players.len()) {
        return Err(TournamentError::UnsupportedPlayerCount(players.len()));
    }
    let mut seen = HashSet::with_capacity(players.len());
    if let Some(dup) = players.iter().find(|p| !seen.insert(**p)) {
        return Err(TournamentError::DuplicatePlayer(*dup));
    }

    if shuffle_teams {
        players.shuffle(rng);
    }

    let mut tournament = Tournament::new(
        name,
        tournament_type,
        category,
        allow_ties,
        pair_players(&players),
    );
    tournament.points_override = points_override;
    tournament.matches = generate_schedule(&tournament)?;

    log::info!(
        "Created {} tournament {} ({} teams, {} matches)",
        tournament.tournament_type,
        tournament.name,
        tournament.teams.len(),
        tournament.matches.len()
    );
    Ok(tournament)
}
