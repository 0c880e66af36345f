//! Phase progress: decides after every result whether a round, phase or the whole
//! tournament is complete, and keeps the following rounds in line with the results.

use crate::logic::bracket::{next_round, seed_playoffs, Advance, PlannedMatch};
use crate::logic::points::{finalize, PointsConfig};
use crate::logic::results::StatsLedger;
use crate::logic::standings::group_standings;
use crate::models::{Match, Tournament, TournamentError, TournamentStatus, TournamentType};
use chrono::Utc;
use serde::Serialize;

/// Something the state machine did (or could not do) after a result.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum ProgressEvent {
    /// A new round was scheduled.
    RoundGenerated { phase: u8, round: u32 },
    /// An unplayed round was replaced because the results feeding it changed.
    RoundRegenerated { phase: u8, round: u32 },
    /// Group stage finished; playoffs are drawn.
    PhaseComplete { phase: u8 },
    /// A 6- or 12-team knockout finished its first round; no continuation exists.
    BracketUndefined { team_count: usize },
    /// Final placements and points were (re)computed.
    Finished,
}

/// Outcome of comparing a round against what the bracket now calls for.
enum RoundSync {
    Unchanged,
    Created,
    Replaced,
    Frozen,
}

/// Bring the tournament up to date with its match results.
///
/// Idempotent: running it twice on the same match set changes nothing the second
/// time (apart from re-finalising a finished tournament, which is an upsert).
pub fn advance(
    tournament: &mut Tournament,
    ledger: &mut StatsLedger,
    points: &PointsConfig,
) -> Result<Vec<ProgressEvent>, TournamentError> {
    let mut events = Vec::new();

    if tournament.status == TournamentStatus::Created && tournament.completed_matches().next().is_some() {
        tournament.status = TournamentStatus::InProgress;
        log::info!("Tournament {} in progress", tournament.name);
    }

    let done = match tournament.tournament_type {
        TournamentType::RoundRobin => tournament.all_matches_complete(),
        TournamentType::Knockout => advance_rounds(tournament, 1, &mut events)?,
        TournamentType::GroupStageKnockout => advance_group_stage(tournament, &mut events)?,
    };

    if done {
        finish(tournament, ledger, points)?;
        events.push(ProgressEvent::Finished);
    }
    Ok(events)
}

fn advance_group_stage(
    tournament: &mut Tournament,
    events: &mut Vec<ProgressEvent>,
) -> Result<bool, TournamentError> {
    if !tournament.is_phase_complete(1) {
        return Ok(false);
    }

    let planned = seed_playoffs(&group_standings(tournament, 1))?;
    match sync_round(tournament, 2, 1, &planned) {
        RoundSync::Created => {
            log::info!("Tournament {}: group stage complete, playoffs drawn", tournament.name);
            events.push(ProgressEvent::PhaseComplete { phase: 1 });
            events.push(ProgressEvent::RoundGenerated { phase: 2, round: 1 });
        }
        RoundSync::Replaced => events.push(ProgressEvent::RoundRegenerated { phase: 2, round: 1 }),
        RoundSync::Unchanged | RoundSync::Frozen => {}
    }

    tournament.current_phase = 2;
    let playoffs_started = tournament.phase_matches(2).iter().any(|m| m.is_completed());
    if !tournament.is_finished() {
        tournament.status = if playoffs_started {
            TournamentStatus::InProgress
        } else {
            TournamentStatus::Phase1Complete
        };
    }

    advance_rounds(tournament, 2, events)
}

/// Walk the rounds of a bracket phase in order, syncing each successor of a
/// complete round. Returns true once the placement finals are all played.
fn advance_rounds(
    tournament: &mut Tournament,
    phase: u8,
    events: &mut Vec<ProgressEvent>,
) -> Result<bool, TournamentError> {
    let mut round = 1;
    loop {
        if !tournament.is_round_complete(phase, round) {
            return Ok(false);
        }
        let step = next_round(&tournament.round_matches(phase, round))?;
        match step {
            Advance::Terminal => return Ok(true),
            Advance::Undefined => {
                log::warn!(
                    "Tournament {}: no continuation defined after round {} for {} teams",
                    tournament.name,
                    round,
                    tournament.teams.len()
                );
                events.push(ProgressEvent::BracketUndefined {
                    team_count: tournament.teams.len(),
                });
                return Ok(false);
            }
            Advance::Next(planned) => {
                let next = round + 1;
                match sync_round(tournament, phase, next, &planned) {
                    RoundSync::Created => events.push(ProgressEvent::RoundGenerated { phase, round: next }),
                    RoundSync::Replaced => events.push(ProgressEvent::RoundRegenerated { phase, round: next }),
                    RoundSync::Unchanged | RoundSync::Frozen => {}
                }
                round = next;
            }
        }
    }
}

/// Make `(phase, round)` hold exactly the planned matches, unless any of its
/// matches has already been played.
fn sync_round(
    tournament: &mut Tournament,
    phase: u8,
    round: u32,
    planned: &[PlannedMatch],
) -> RoundSync {
    let existing = tournament.round_matches(phase, round);
    if !existing.is_empty() {
        let same = existing.len() == planned.len()
            && existing.iter().zip(planned).all(|(m, p)| p.matches_scheduled(m));
        if same {
            return RoundSync::Unchanged;
        }
        if existing.iter().any(|m| m.is_completed()) {
            log::warn!(
                "Tournament {}: phase {} round {} already has results; keeping it despite upstream changes",
                tournament.name,
                phase,
                round
            );
            return RoundSync::Frozen;
        }
    }
    let replacing = !existing.is_empty();

    if replacing {
        tournament
            .matches
            .retain(|m| !(m.phase == phase && m.round_number >= round && !m.is_completed()));
    }

    let first_number = tournament
        .matches
        .iter()
        .filter(|m| m.phase == phase && m.round_number < round)
        .map(|m| m.match_number)
        .max()
        .unwrap_or(0)
        + 1;
    let tournament_id = tournament.id;
    tournament
        .matches
        .extend(planned.iter().enumerate().map(|(i, p)| {
            Match::new(
                tournament_id,
                phase,
                round,
                first_number + i as u32,
                p.slot,
                p.team_a,
                p.team_b,
            )
        }));

    if replacing {
        log::info!(
            "Tournament {}: phase {} round {} regenerated ({} matches)",
            tournament.name,
            phase,
            round,
            planned.len()
        );
        RoundSync::Replaced
    } else {
        log::info!(
            "Tournament {}: phase {} round {} generated ({} matches)",
            tournament.name,
            phase,
            round,
            planned.len()
        );
        RoundSync::Created
    }
}

fn finish(
    tournament: &mut Tournament,
    ledger: &mut StatsLedger,
    points: &PointsConfig,
) -> Result<(), TournamentError> {
    if tournament.is_finished() {
        log::info!("Tournament {}: result corrected after finish, re-finalising", tournament.name);
    } else {
        tournament.status = TournamentStatus::Finished;
        tournament.finished_at = Some(Utc::now());
        log::info!("Tournament {} finished", tournament.name);
    }
    finalize(tournament, ledger, points)?;
    Ok(())
}
