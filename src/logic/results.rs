//! Result submission: score validation, winner determination, and player stats
//! that can be corrected without double counting.

use crate::logic::points::PointsConfig;
use crate::logic::progress::{advance, ProgressEvent};
use crate::models::{
    Match, MatchId, MatchRecord, MatchStatus, Outcome, PlayerId, PlayerStats, Side, TieRule,
    Tournament, TournamentError, TournamentId, TournamentResult, TournamentType,
    MAX_GAMES_PER_SET,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Games won by each side in the single set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    pub team1_score: i32,
    pub team2_score: i32,
}

impl ScoreSubmission {
    pub fn new(team1_score: i32, team2_score: i32) -> Self {
        Self {
            team1_score,
            team2_score,
        }
    }

    pub fn is_tie(&self) -> bool {
        self.team1_score == self.team2_score
    }

    /// `None` for a tie.
    pub fn winner(&self) -> Option<Side> {
        match self.team1_score.cmp(&self.team2_score) {
            std::cmp::Ordering::Greater => Some(Side::One),
            std::cmp::Ordering::Less => Some(Side::Two),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Cumulative player statistics plus the records they are built from.
///
/// Every player keeps one [`MatchRecord`] per match played and one
/// [`TournamentResult`] per finished tournament. Counters are updated
/// incrementally; [`StatsLedger::recalculate`] rebuilds them from the records.
#[derive(Clone, Debug, Default)]
pub struct StatsLedger {
    stats: HashMap<PlayerId, PlayerStats>,
    history: HashMap<PlayerId, Vec<MatchRecord>>,
    results: HashMap<(TournamentId, PlayerId), TournamentResult>,
}

impl StatsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self, player: PlayerId) -> Option<&PlayerStats> {
        self.stats.get(&player)
    }

    pub fn history(&self, player: PlayerId) -> &[MatchRecord] {
        self.history.get(&player).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn result(&self, tournament: TournamentId, player: PlayerId) -> Option<&TournamentResult> {
        self.results.get(&(tournament, player))
    }

    /// Results of one tournament, best position first.
    pub fn tournament_results(&self, tournament: TournamentId) -> Vec<&TournamentResult> {
        let mut rs: Vec<&TournamentResult> = self
            .results
            .values()
            .filter(|r| r.tournament_id == tournament)
            .collect();
        rs.sort_by_key(|r| (r.position, r.player_id));
        rs
    }

    /// Apply a completed match to all four players, creating stats on first sight.
    pub fn record_match(&mut self, m: &Match) -> Result<(), TournamentError> {
        let mut updated = Vec::with_capacity(4);
        for (player, record) in match_records(m) {
            let mut stats = self
                .stats
                .get(&player)
                .cloned()
                .unwrap_or_else(|| PlayerStats::new(player));
            stats.apply_match(&record, 1)?;
            updated.push((stats, record));
        }
        for (stats, record) in updated {
            let history = self.history.entry(stats.player_id).or_default();
            history.retain(|r| r.match_id != record.match_id);
            history.push(record);
            self.stats.insert(stats.player_id, stats);
        }
        Ok(())
    }

    /// Withdraw a previously recorded match from all four players.
    ///
    /// Each player's stored record for the match is withdrawn. Fails without
    /// touching anyone if a player has no stats or no record for the match.
    pub fn reverse_match(&mut self, m: &Match) -> Result<(), TournamentError> {
        let mut updated = Vec::with_capacity(4);
        for player in m.players() {
            let record = self
                .history
                .get(&player)
                .and_then(|h| h.iter().find(|r| r.match_id == m.id));
            let (Some(mut stats), Some(record)) = (self.stats.get(&player).cloned(), record) else {
                return Err(TournamentError::ReverseNonexistentStats(player));
            };
            stats.apply_match(record, -1)?;
            updated.push(stats);
        }
        for stats in updated {
            if let Some(history) = self.history.get_mut(&stats.player_id) {
                history.retain(|r| r.match_id != m.id);
            }
            self.stats.insert(stats.player_id, stats);
        }
        Ok(())
    }

    /// Insert or replace a tournament result, withdrawing the replaced award first.
    pub fn upsert_result(&mut self, result: TournamentResult) -> Result<(), TournamentError> {
        let player = result.player_id;
        let mut stats = self
            .stats
            .get(&player)
            .cloned()
            .unwrap_or_else(|| PlayerStats::new(player));
        if let Some(previous) = self.results.get(&(result.tournament_id, player)) {
            stats.apply_award(previous, -1)?;
        }
        stats.apply_award(&result, 1)?;
        self.stats.insert(player, stats);
        self.results.insert((result.tournament_id, player), result);
        Ok(())
    }

    /// Rebuild a player's stats from scratch out of their records.
    /// `Ok(None)` for a player the ledger has never seen.
    pub fn recalculate(&mut self, player: PlayerId) -> Result<Option<&PlayerStats>, TournamentError> {
        let history = self.history.get(&player);
        let awards: Vec<&TournamentResult> = self
            .results
            .values()
            .filter(|r| r.player_id == player)
            .collect();
        if history.map_or(true, Vec::is_empty) && awards.is_empty() && !self.stats.contains_key(&player) {
            return Ok(None);
        }
        let mut fresh = PlayerStats::new(player);
        for record in history.into_iter().flatten() {
            fresh.apply_match(record, 1)?;
        }
        for award in awards {
            fresh.apply_award(award, 1)?;
        }
        log::debug!("Recalculated stats for player {}", player);
        self.stats.insert(player, fresh);
        Ok(self.stats.get(&player))
    }
}

/// What a completed match means for each of its four players.
fn match_records(m: &Match) -> Vec<(PlayerId, MatchRecord)> {
    let recorded_at = m.completed_at.unwrap_or_else(Utc::now);
    [Side::One, Side::Two]
        .into_iter()
        .flat_map(|side| {
            let outcome = match m.winner_team {
                None => Outcome::Draw,
                Some(w) if w == side => Outcome::Win,
                Some(_) => Outcome::Loss,
            };
            let record = MatchRecord {
                match_id: m.id,
                tournament_id: m.tournament_id,
                outcome,
                games_for: m.games(side),
                games_against: m.games(side.other()),
                recorded_at,
            };
            m.team(side)
                .players()
                .into_iter()
                .map(move |p| (p, record.clone()))
        })
        .collect()
}

fn check_tie(tournament: &Tournament, m: &Match) -> Result<(), TournamentError> {
    if !tournament.allow_ties {
        return Err(TournamentError::TieNotAllowed(TieRule::TournamentDisallowsTies));
    }
    if m.phase != 1 {
        return Err(TournamentError::TieNotAllowed(TieRule::PlayoffPhase));
    }
    if tournament.tournament_type == TournamentType::Knockout {
        return Err(TournamentError::TieNotAllowed(TieRule::KnockoutFormat));
    }
    Ok(())
}

/// Record (or correct) a match score, update player stats, and advance the tournament.
///
/// All-or-nothing: the work runs on a copy of the tournament and the ledger, and
/// both are replaced only once the tournament has advanced without error.
/// Correcting a completed match withdraws the old result from the players first.
pub fn submit_result(
    tournament: &mut Tournament,
    ledger: &mut StatsLedger,
    points: &PointsConfig,
    match_id: MatchId,
    score: ScoreSubmission,
) -> Result<Vec<ProgressEvent>, TournamentError> {
    let valid = 0..=MAX_GAMES_PER_SET;
    if !valid.contains(&score.team1_score) || !valid.contains(&score.team2_score) {
        return Err(TournamentError::InvalidScore {
            team1_score: score.team1_score,
            team2_score: score.team2_score,
        });
    }

    let previous = {
        let m = tournament.get_match(match_id)?;
        if m.status == MatchStatus::Cancelled {
            return Err(TournamentError::MatchCancelled(match_id));
        }
        if score.is_tie() {
            check_tie(tournament, m)?;
        }
        m.is_completed().then(|| m.clone())
    };

    let mut staged = tournament.clone();
    let mut staged_ledger = ledger.clone();

    if let Some(old) = &previous {
        staged_ledger.reverse_match(old)?;
        log::info!(
            "Correcting match #{} (round {}): {}-{} -> {}-{}",
            old.match_number,
            old.round_number,
            old.games(Side::One),
            old.games(Side::Two),
            score.team1_score,
            score.team2_score
        );
    }

    let winner = score.winner();
    let m = staged.get_match_mut(match_id)?;
    m.set1_team1 = Some(score.team1_score as u32);
    m.set1_team2 = Some(score.team2_score as u32);
    m.team1_score = u32::from(winner == Some(Side::One));
    m.team2_score = u32::from(winner == Some(Side::Two));
    m.winner_team = winner;
    m.status = MatchStatus::Completed;
    m.completed_at = Some(Utc::now());
    let recorded = m.clone();

    staged_ledger.record_match(&recorded)?;
    if previous.is_none() {
        log::info!(
            "Match #{} (phase {}, round {}) recorded {}-{}",
            recorded.match_number,
            recorded.phase,
            recorded.round_number,
            score.team1_score,
            score.team2_score
        );
    }

    let events = advance(&mut staged, &mut staged_ledger, points)?;
    *tournament = staged;
    *ledger = staged_ledger;
    Ok(events)
}
