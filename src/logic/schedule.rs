//! Schedule generation: round-robin fixtures (single or multi-group) and knockout
//! first-round pairings.

use crate::models::{
    BracketSlot, Match, Team, Tier, Tournament, TournamentError, TournamentId, TournamentType,
};

/// `(team A index, team B index, match day)`.
type Fixture = (usize, usize, u32);

/// Three teams: one match per day, no disjointness possible.
const THREE_TEAMS: &[Fixture] = &[(0, 1, 1), (0, 2, 2), (1, 2, 3)];

/// One-factorisation of K4: three days of two disjoint pairs.
const FOUR_TEAMS: &[Fixture] = &[
    (0, 1, 1),
    (2, 3, 1),
    (0, 2, 2),
    (1, 3, 2),
    (0, 3, 3),
    (1, 2, 3),
];

/// One-factorisation of K6 (circle method, team 0 fixed): five days of three pairs.
const SIX_TEAMS: &[Fixture] = &[
    (0, 1, 1),
    (2, 5, 1),
    (3, 4, 1),
    (0, 2, 2),
    (1, 3, 2),
    (4, 5, 2),
    (0, 3, 3),
    (1, 5, 3),
    (2, 4, 3),
    (0, 4, 4),
    (1, 2, 4),
    (3, 5, 4),
    (0, 5, 5),
    (1, 4, 5),
    (2, 3, 5),
];

const GROUP_SIZE: usize = 4;

fn fixture_table(team_count: usize) -> Option<&'static [Fixture]> {
    match team_count {
        3 => Some(THREE_TEAMS),
        4 => Some(FOUR_TEAMS),
        6 => Some(SIX_TEAMS),
        _ => None,
    }
}

/// Generate the opening matches for a tournament from its seeded teams.
pub fn generate_schedule(tournament: &Tournament) -> Result<Vec<Match>, TournamentError> {
    let teams = &tournament.teams;
    match tournament.tournament_type {
        TournamentType::RoundRobin => generate_round_robin(tournament.id, teams),
        TournamentType::Knockout => generate_knockout_first_round(tournament.id, teams),
        TournamentType::GroupStageKnockout => match teams.len() {
            4 | 8 | 12 => generate_round_robin(tournament.id, teams),
            n => Err(TournamentError::UnsupportedTeamCount {
                format: TournamentType::GroupStageKnockout,
                count: n,
            }),
        },
    }
}

/// Round robin for 3, 4 or 6 teams (one group) or 8 / 12 teams (groups of four).
pub fn generate_round_robin(
    tournament_id: TournamentId,
    teams: &[Team],
) -> Result<Vec<Match>, TournamentError> {
    match teams.len() {
        3 | 4 | 6 => round_robin_group(tournament_id, teams, None),
        8 | 12 => generate_multi_group(tournament_id, teams),
        n => Err(TournamentError::UnsupportedTeamCount {
            format: TournamentType::RoundRobin,
            count: n,
        }),
    }
}

/// Split teams into contiguous blocks of four (block i = group i + 1), run the
/// four-team table in each, then renumber matches across all groups.
fn generate_multi_group(
    tournament_id: TournamentId,
    teams: &[Team],
) -> Result<Vec<Match>, TournamentError> {
    let mut matches = Vec::with_capacity(teams.len() / GROUP_SIZE * FOUR_TEAMS.len());
    for (i, block) in teams.chunks(GROUP_SIZE).enumerate() {
        let group = i as u32 + 1;
        matches.extend(round_robin_group(tournament_id, block, Some(group))?);
    }
    for (i, m) in matches.iter_mut().enumerate() {
        m.match_number = i as u32 + 1;
    }
    log::debug!(
        "Generated {} group matches across {} groups",
        matches.len(),
        teams.len() / GROUP_SIZE
    );
    Ok(matches)
}

fn round_robin_group(
    tournament_id: TournamentId,
    teams: &[Team],
    group: Option<u32>,
) -> Result<Vec<Match>, TournamentError> {
    let table = fixture_table(teams.len()).ok_or(TournamentError::UnsupportedTeamCount {
        format: TournamentType::RoundRobin,
        count: teams.len(),
    })?;
    let matches = table
        .iter()
        .enumerate()
        .map(|(i, &(a, b, day))| {
            let m = Match::new(
                tournament_id,
                1,
                1,
                i as u32 + 1,
                BracketSlot::GroupFixture,
                teams[a],
                teams[b],
            )
            .with_day(day);
            match group {
                Some(g) => m.with_group(g),
                None => m,
            }
        })
        .collect();
    Ok(matches)
}

/// First knockout round: consecutive seeds meet (0v1, 2v3, ...).
pub fn generate_knockout_first_round(
    tournament_id: TournamentId,
    teams: &[Team],
) -> Result<Vec<Match>, TournamentError> {
    let slot = match teams.len() {
        4 => BracketSlot::SemiFinal(Tier::Top),
        8 => BracketSlot::QuarterFinal,
        6 | 12 => BracketSlot::OpeningRound,
        n => {
            return Err(TournamentError::UnsupportedTeamCount {
                format: TournamentType::Knockout,
                count: n,
            })
        }
    };
    let matches = teams
        .chunks_exact(2)
        .enumerate()
        .map(|(i, pair)| Match::new(tournament_id, 1, 1, i as u32 + 1, slot, pair[0], pair[1]))
        .collect();
    Ok(matches)
}
