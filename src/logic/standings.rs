//! Team standings from completed matches, and the tiebreak chain that orders them.

use crate::models::{Match, Side, TeamStanding, Tournament};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Build one standing per team appearing in the completed matches, in order of
/// first appearance. Unplayed matches are ignored.
pub fn build_standings<'a, I>(matches: I) -> Vec<TeamStanding>
where
    I: IntoIterator<Item = &'a Match>,
{
    let mut standings: Vec<TeamStanding> = Vec::new();
    for m in matches.into_iter().filter(|m| m.is_completed()) {
        for side in [Side::One, Side::Two] {
            let team = m.team(side);
            let idx = match standings.iter().position(|s| s.team == team) {
                Some(i) => i,
                None => {
                    standings.push(TeamStanding::new(team, m.group_number));
                    standings.len() - 1
                }
            };
            record(&mut standings[idx], m, side);
        }
    }
    standings
}

fn record(s: &mut TeamStanding, m: &Match, side: Side) {
    s.matches_played += 1;
    match m.winner_team {
        Some(w) if w == side => {
            s.matches_won += 1;
            s.points += 2;
        }
        Some(_) => s.matches_lost += 1,
        None => {
            s.matches_drawn += 1;
            s.points += 1;
        }
    }
    s.sets_won += m.sets(side);
    s.sets_lost += m.sets(side.other());
    s.games_won += u64::from(m.games(side));
    s.games_lost += u64::from(m.games(side.other()));
}

/// Tiebreak chain: points, then set difference, then game difference.
/// `Ordering::Less` means `a` ranks ahead of `b`.
pub fn compare_standings(a: &TeamStanding, b: &TeamStanding) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.set_difference().cmp(&a.set_difference()))
        .then_with(|| b.game_difference().cmp(&a.game_difference()))
}

/// True when the tiebreak chain cannot separate the two.
pub fn is_dead_heat(a: &TeamStanding, b: &TeamStanding) -> bool {
    compare_standings(a, b) == Ordering::Equal
}

/// Sort best-first. Stable, so dead heats keep their input order.
pub fn rank_standings(mut standings: Vec<TeamStanding>) -> Vec<TeamStanding> {
    standings.sort_by(compare_standings);
    standings
}

/// Ranked standings per group for a phase. A single-group phase is keyed as group 1.
pub fn group_standings(tournament: &Tournament, phase: u8) -> BTreeMap<u32, Vec<TeamStanding>> {
    let mut by_group: BTreeMap<u32, Vec<&Match>> = BTreeMap::new();
    for m in tournament.phase_matches(phase) {
        by_group.entry(m.group_number.unwrap_or(1)).or_default().push(m);
    }
    by_group
        .into_iter()
        .map(|(g, ms)| (g, rank_standings(build_standings(ms))))
        .collect()
}

/// All teams of the tournament ranked together over every completed match.
pub fn overall_standings(tournament: &Tournament) -> Vec<TeamStanding> {
    rank_standings(build_standings(&tournament.matches))
}
