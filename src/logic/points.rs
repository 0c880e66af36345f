//! Final placements and ranking points for finished tournaments.

use crate::logic::results::StatsLedger;
use crate::logic::standings::{group_standings, is_dead_heat, overall_standings};
use crate::models::{
    Category, Match, Placement, PlayerId, PointsTable, TeamStanding, Tournament, TournamentError,
    TournamentResult, TournamentType,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

fn default_table() -> PointsTable {
    BTreeMap::from([(1, 7.5), (2, 5.0), (3, 3.0), (4, 1.0)])
}

/// Category points tables. Unknown categories use `default_table`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointsConfig {
    #[serde(default)]
    pub tables: BTreeMap<Category, PointsTable>,
    #[serde(default = "default_table")]
    pub default_table: PointsTable,
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            tables: BTreeMap::from([(Category::default(), default_table())]),
            default_table: default_table(),
        }
    }
}

impl PointsConfig {
    /// Parse from JSON, e.g. `{"tables": {"OPEN_500": {"1": 15, "2": 10}}}`.
    pub fn from_json_str(json: &str) -> Result<Self, TournamentError> {
        serde_json::from_str(json).map_err(|e| TournamentError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, TournamentError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| TournamentError::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded {} points table(s) from {}",
            config.tables.len(),
            path.display()
        );
        Ok(config)
    }

    pub fn table_for(&self, category: &Category) -> &PointsTable {
        self.tables.get(category).unwrap_or(&self.default_table)
    }
}

/// Placements of every team of a finished tournament, best first.
pub fn final_placements(tournament: &Tournament) -> Vec<Placement> {
    let mut placements = match tournament.tournament_type {
        TournamentType::RoundRobin => ranked_placements(&overall_standings(tournament)),
        TournamentType::Knockout | TournamentType::GroupStageKnockout => {
            bracket_placements(&tournament.matches)
        }
    };

    // Teams that never reached a placement final take the next free places,
    // in seeding order.
    let mut next = placements.iter().map(|p| p.position).max().unwrap_or(0) + 1;
    for team in &tournament.teams {
        if !placements.iter().any(|p| p.team == *team) {
            placements.push(Placement {
                team: *team,
                position: next,
            });
            next += 1;
        }
    }
    placements.sort_by_key(|p| p.position);
    placements
}

/// Standard competition ranking: dead heats share a position, the next one skips.
fn ranked_placements(ranked: &[TeamStanding]) -> Vec<Placement> {
    let mut placements: Vec<Placement> = Vec::with_capacity(ranked.len());
    for (i, standing) in ranked.iter().enumerate() {
        let position = match (i.checked_sub(1).map(|j| &ranked[j]), placements.last()) {
            (Some(prev), Some(last)) if is_dead_heat(prev, standing) => last.position,
            _ => i as u32 + 1,
        };
        placements.push(Placement {
            team: standing.team,
            position,
        });
    }
    placements
}

fn bracket_placements(matches: &[Match]) -> Vec<Placement> {
    let mut finals: Vec<&Match> = matches
        .iter()
        .filter(|m| m.is_completed() && m.slot.is_placement_final())
        .collect();
    finals.sort_by_key(|m| (m.phase, m.match_number));

    let mut placements = Vec::with_capacity(finals.len() * 2);
    for m in finals {
        let (Some((winner_place, loser_place)), Some(winner), Some(loser)) =
            (m.slot.placing(), m.winner(), m.loser())
        else {
            continue;
        };
        placements.push(Placement {
            team: winner,
            position: winner_place,
        });
        placements.push(Placement {
            team: loser,
            position: loser_place,
        });
    }
    placements
}

fn matches_won(tournament: &Tournament, player: PlayerId) -> u32 {
    tournament
        .completed_matches()
        .filter(|m| m.winner().is_some_and(|w| w.contains(player)))
        .count() as u32
}

/// Award positions and points to every player and fold them into cumulative stats.
///
/// Base points come from the tournament's override table or its category table;
/// bonus points are the matches the player won in this tournament. Re-running
/// replaces the previous award.
pub fn finalize(
    tournament: &Tournament,
    ledger: &mut StatsLedger,
    config: &PointsConfig,
) -> Result<Vec<TournamentResult>, TournamentError> {
    let table = tournament
        .points_override
        .as_ref()
        .unwrap_or_else(|| config.table_for(&tournament.category));
    let awarded_at = Utc::now();

    let mut seen = HashSet::new();
    let mut results = Vec::with_capacity(tournament.teams.len() * 2);
    for placement in final_placements(tournament) {
        for player in placement.team.players() {
            if !seen.insert(player) {
                return Err(TournamentError::DuplicatePlayer(player));
            }
            let base_points = table.get(&placement.position).copied().unwrap_or(0.0);
            let bonus_points = f64::from(matches_won(tournament, player));
            let result = TournamentResult {
                tournament_id: tournament.id,
                player_id: player,
                position: placement.position,
                base_points,
                bonus_points,
                total_points: base_points + bonus_points,
                awarded_at,
            };
            ledger.upsert_result(result.clone())?;
            results.push(result);
        }
    }
    log::info!(
        "Tournament {}: awarded points to {} players",
        tournament.name,
        results.len()
    );
    Ok(results)
}

/// What the standings endpoint shows for a tournament.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StandingsView {
    /// Ranked group tables of phase 1 (a single group is keyed as group 1).
    Groups { groups: BTreeMap<u32, Vec<TeamStanding>> },
    /// Final results once the tournament is finished.
    Final { results: Vec<TournamentResult> },
}

pub fn standings_view(tournament: &Tournament, ledger: &StatsLedger) -> StandingsView {
    if tournament.is_finished() {
        StandingsView::Final {
            results: ledger
                .tournament_results(tournament.id)
                .into_iter()
                .cloned()
                .collect(),
        }
    } else {
        StandingsView::Groups {
            groups: group_standings(tournament, 1),
        }
    }
}
