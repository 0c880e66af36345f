//! Bracket advancement: next-round pairings from a completed round, and playoff
//! seeding from group standings.

use crate::logic::standings::rank_standings;
use crate::models::{BracketSlot, Match, Team, TeamStanding, Tier, TournamentError};
use std::collections::BTreeMap;

/// A match the bracket calls for. Compared against what is already scheduled
/// before anything is created or replaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlannedMatch {
    pub slot: BracketSlot,
    pub team_a: Team,
    pub team_b: Team,
}

impl PlannedMatch {
    pub fn new(slot: BracketSlot, team_a: Team, team_b: Team) -> Self {
        Self {
            slot,
            team_a,
            team_b,
        }
    }

    /// Same slot and same two teams on the same sides.
    pub fn matches_scheduled(&self, m: &Match) -> bool {
        m.slot == self.slot && m.teams() == (self.team_a, self.team_b)
    }
}

/// What follows a completed round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Advance {
    Next(Vec<PlannedMatch>),
    /// The round was made of placement finals; nothing follows.
    Terminal,
    /// First round of a 6- or 12-team knockout: no continuation is defined.
    Undefined,
}

fn decided(m: &Match) -> Result<(Team, Team), TournamentError> {
    match (m.is_completed(), m.winner(), m.loser()) {
        (true, Some(w), Some(l)) => Ok((w, l)),
        _ => Err(TournamentError::MalformedBracket(format!(
            "match #{} in round {} has no decided winner",
            m.match_number, m.round_number
        ))),
    }
}

/// Pairings for the round after `round`. `round` must be complete and sorted by
/// match number.
pub fn next_round(round: &[&Match]) -> Result<Advance, TournamentError> {
    let Some(first) = round.first() else {
        return Err(TournamentError::MalformedBracket("empty round".to_string()));
    };
    if round.iter().all(|m| m.slot.is_placement_final()) {
        return Ok(Advance::Terminal);
    }
    if round.iter().any(|m| m.slot == BracketSlot::OpeningRound) {
        return Ok(Advance::Undefined);
    }
    if round.iter().all(|m| m.slot == BracketSlot::QuarterFinal) {
        return after_quarter_finals(round).map(Advance::Next);
    }
    if round.iter().all(|m| matches!(m.slot, BracketSlot::SemiFinal(_))) {
        return after_semi_finals(round).map(Advance::Next);
    }
    Err(TournamentError::MalformedBracket(format!(
        "round {} mixes bracket slots",
        first.round_number
    )))
}

/// Four quarterfinals: winners of QF1/QF2 and QF3/QF4 play for 1st-4th,
/// the losers of the same pairs for 5th-8th.
fn after_quarter_finals(round: &[&Match]) -> Result<Vec<PlannedMatch>, TournamentError> {
    if round.len() != 4 {
        return Err(TournamentError::MalformedBracket(format!(
            "expected 4 quarterfinals, found {}",
            round.len()
        )));
    }
    let results = round
        .iter()
        .map(|m| decided(m))
        .collect::<Result<Vec<_>, _>>()?;
    let top = BracketSlot::SemiFinal(Tier::Top);
    let middle = BracketSlot::SemiFinal(Tier::Middle);
    Ok(vec![
        PlannedMatch::new(top, results[0].0, results[1].0),
        PlannedMatch::new(top, results[2].0, results[3].0),
        PlannedMatch::new(middle, results[0].1, results[1].1),
        PlannedMatch::new(middle, results[2].1, results[3].1),
    ])
}

/// Each bracket's two semifinals feed its two placement finals.
fn after_semi_finals(round: &[&Match]) -> Result<Vec<PlannedMatch>, TournamentError> {
    let mut by_tier: BTreeMap<Tier, Vec<&Match>> = BTreeMap::new();
    for m in round {
        if let BracketSlot::SemiFinal(tier) = m.slot {
            by_tier.entry(tier).or_default().push(*m);
        }
    }
    let mut planned = Vec::with_capacity(round.len());
    for (tier, semis) in by_tier {
        let [s1, s2] = semis.as_slice() else {
            return Err(TournamentError::MalformedBracket(format!(
                "expected 2 semifinals for places {}-{}, found {}",
                tier.base_place(),
                tier.base_place() + 3,
                semis.len()
            )));
        };
        let (w1, l1) = decided(s1)?;
        let (w2, l2) = decided(s2)?;
        let (upper, lower) = tier.finals();
        planned.push(PlannedMatch::new(upper, w1, w2));
        planned.push(PlannedMatch::new(lower, l1, l2));
    }
    Ok(planned)
}

/// Playoff round 1 from ranked group standings (groups keyed 1, 2, 3).
///
/// * one group: 1st v 2nd is the final, 3rd v 4th the third-place match;
/// * two groups: 1A v 2B and 2A v 1B for 1st-4th, 3A v 4B and 3B v 4A for 5th-8th;
/// * three groups: group winners plus the best runner-up play for 1st-4th, the
///   other runners-up and the two best thirds for 5th-8th, the worst third and
///   the fourths for 9th-12th. Each bracket pairs seed 1 v 4 and 2 v 3.
pub fn seed_playoffs(
    groups: &BTreeMap<u32, Vec<TeamStanding>>,
) -> Result<Vec<PlannedMatch>, TournamentError> {
    let ranked: Vec<[TeamStanding; 4]> = groups
        .values()
        .map(|g| {
            <[TeamStanding; 4]>::try_from(g.clone()).map_err(|g| {
                TournamentError::MalformedBracket(format!(
                    "group needs 4 ranked teams, found {}",
                    g.len()
                ))
            })
        })
        .collect::<Result<_, _>>()?;

    match ranked.as_slice() {
        [a] => Ok(vec![
            PlannedMatch::new(BracketSlot::Final, a[0].team, a[1].team),
            PlannedMatch::new(BracketSlot::ThirdPlace, a[2].team, a[3].team),
        ]),
        [a, b] => {
            let top = BracketSlot::SemiFinal(Tier::Top);
            let middle = BracketSlot::SemiFinal(Tier::Middle);
            Ok(vec![
                PlannedMatch::new(top, a[0].team, b[1].team),
                PlannedMatch::new(top, a[1].team, b[0].team),
                PlannedMatch::new(middle, a[2].team, b[3].team),
                PlannedMatch::new(middle, b[2].team, a[3].team),
            ])
        }
        [a, b, c] => {
            let across = |place: usize| -> Vec<Team> {
                rank_standings(vec![a[place].clone(), b[place].clone(), c[place].clone()])
                    .into_iter()
                    .map(|s| s.team)
                    .collect()
            };
            let (firsts, seconds, thirds, fourths) = (across(0), across(1), across(2), across(3));

            let mut planned =
                seeded_semis(Tier::Top, [firsts[0], firsts[1], firsts[2], seconds[0]]).to_vec();
            planned.extend(seeded_semis(
                Tier::Middle,
                [seconds[1], seconds[2], thirds[0], thirds[1]],
            ));
            planned.extend(seeded_semis(
                Tier::Bottom,
                [thirds[2], fourths[0], fourths[1], fourths[2]],
            ));
            Ok(planned)
        }
        other => Err(TournamentError::MalformedBracket(format!(
            "no playoff layout for {} groups",
            other.len()
        ))),
    }
}

fn seeded_semis(tier: Tier, seeds: [Team; 4]) -> [PlannedMatch; 2] {
    let slot = BracketSlot::SemiFinal(tier);
    [
        PlannedMatch::new(slot, seeds[0], seeds[3]),
        PlannedMatch::new(slot, seeds[1], seeds[2]),
    ]
}
