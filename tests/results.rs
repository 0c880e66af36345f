//! Integration tests for result submission and reversible player statistics.

mod common;

use common::Harness;
use doubles_tournament::{
    create_tournament, overall_standings, MatchStatus, NewTournament, PlayerStats, Side,
    StatsLedger, TournamentError, TournamentType, MAX_GAMES_PER_SET,
};
use pretty_assertions::assert_eq;

fn snapshot(h: &Harness, players: [uuid::Uuid; 4]) -> Vec<Option<PlayerStats>> {
    players.iter().map(|p| h.ledger.stats(*p).cloned()).collect()
}

#[test]
fn resubmitting_the_same_score_leaves_stats_unchanged() {
    let mut h = Harness::new(TournamentType::RoundRobin, 4, false);
    let m = h.tournament.matches[0].clone();
    h.submit(m.id, 6, 3).unwrap();
    let after_first = snapshot(&h, m.players());

    h.submit(m.id, 6, 3).unwrap();
    assert_eq!(snapshot(&h, m.players()), after_first);

    // flip it and flip it back
    h.submit(m.id, 2, 6).unwrap();
    let flipped = h.ledger.stats(m.player1).unwrap();
    assert_eq!((flipped.matches_won, flipped.matches_lost), (0, 1));
    assert_eq!((flipped.games_won, flipped.games_lost), (2, 6));
    h.submit(m.id, 6, 3).unwrap();
    assert_eq!(snapshot(&h, m.players()), after_first);
    assert_eq!(h.ledger.history(m.player1).len(), 1);
}

#[test]
fn correction_updates_winner_and_sets() {
    let mut h = Harness::new(TournamentType::RoundRobin, 4, true);
    let id = h.tournament.matches[1].id;
    h.submit(id, 6, 4).unwrap();
    h.submit(id, 3, 3).unwrap();

    let m = h.tournament.get_match(id).unwrap();
    assert_eq!(m.status, MatchStatus::Completed);
    assert_eq!(m.winner_team, None);
    assert_eq!((m.set1_team1, m.set1_team2), (Some(3), Some(3)));
    let stats = h.ledger.stats(m.player1).unwrap();
    assert_eq!((stats.total_matches, stats.matches_won, stats.matches_drawn), (1, 0, 1));
    assert_eq!((stats.sets_won, stats.sets_lost), (0, 0));

    h.submit(id, 1, 6).unwrap();
    let m = h.tournament.get_match(id).unwrap();
    assert_eq!(m.winner_team, Some(Side::Two));
    assert_eq!((m.team1_score, m.team2_score), (0, 1));
}

#[test]
fn win_percentage_tracks_decisive_matches_only() {
    let mut h = Harness::new(TournamentType::RoundRobin, 4, true);
    let player = h.team(0).player1;
    let ids: Vec<_> = h
        .tournament
        .matches
        .iter()
        .filter(|m| m.side_of(player).is_some())
        .map(|m| (m.id, m.side_of(player).unwrap()))
        .collect();
    assert_eq!(ids.len(), 3);

    // win, loss from the player's side
    let score_for = |side: Side, mine: i32, theirs: i32| match side {
        Side::One => (mine, theirs),
        Side::Two => (theirs, mine),
    };
    let (s1, s2) = score_for(ids[0].1, 6, 2);
    h.submit(ids[0].0, s1, s2).unwrap();
    let (s1, s2) = score_for(ids[1].1, 3, 6);
    h.submit(ids[1].0, s1, s2).unwrap();
    assert_eq!(h.ledger.stats(player).unwrap().win_percentage, 50.0);

    let (s1, s2) = score_for(ids[2].1, 4, 4);
    h.submit(ids[2].0, s1, s2).unwrap();
    let stats = h.ledger.stats(player).unwrap();
    assert_eq!((stats.matches_won, stats.matches_lost, stats.matches_drawn), (1, 1, 1));
    assert_eq!(stats.win_percentage, 50.0);
}

#[test]
fn negative_scores_are_rejected_before_any_write() {
    let mut h = Harness::new(TournamentType::RoundRobin, 4, false);
    let id = h.tournament.matches[0].id;
    assert_eq!(
        h.submit(id, -1, 6).unwrap_err(),
        TournamentError::InvalidScore {
            team1_score: -1,
            team2_score: 6
        }
    );
    assert_eq!(h.tournament.get_match(id).unwrap().status, MatchStatus::Scheduled);
}

#[test]
fn scores_above_the_set_limit_are_rejected() {
    let mut h = Harness::new(TournamentType::RoundRobin, 4, false);
    let id = h.tournament.matches[0].id;
    for (s1, s2) in [(i32::MAX, 0), (MAX_GAMES_PER_SET + 1, 3), (2, MAX_GAMES_PER_SET + 1)] {
        assert_eq!(
            h.submit(id, s1, s2).unwrap_err(),
            TournamentError::InvalidScore {
                team1_score: s1,
                team2_score: s2
            }
        );
    }
    let m = h.tournament.get_match(id).unwrap();
    assert_eq!(m.status, MatchStatus::Scheduled);
    assert!(h.ledger.stats(m.player1).is_none());
}

#[test]
fn maximum_scores_finish_a_round_robin() {
    let mut h = Harness::new(TournamentType::RoundRobin, 4, false);
    let (a, b, c, d) = (h.team(0), h.team(1), h.team(2), h.team(3));
    h.beat(a, b, MAX_GAMES_PER_SET, 0);
    h.beat(a, c, MAX_GAMES_PER_SET, 0);
    h.beat(a, d, MAX_GAMES_PER_SET, 0);
    h.beat(b, c, 6, 3);
    h.beat(b, d, 6, 3);
    h.beat(c, d, 6, 3);
    assert!(h.tournament.is_finished());

    let top = &overall_standings(&h.tournament)[0];
    assert_eq!(top.team, a);
    assert_eq!(top.games_won, 3 * MAX_GAMES_PER_SET as u64);
    assert_eq!(h.position_of(a.player1), 1);
    assert_eq!(h.ledger.stats(a.player2).unwrap().games_won, 3 * MAX_GAMES_PER_SET as u32);
}

#[test]
fn unknown_match_is_not_found() {
    let mut h = Harness::new(TournamentType::RoundRobin, 4, false);
    let id = uuid::Uuid::new_v4();
    assert_eq!(h.submit(id, 6, 1).unwrap_err(), TournamentError::MatchNotFound(id));
}

#[test]
fn correcting_without_recorded_stats_fails_cleanly() {
    let mut h = Harness::new(TournamentType::RoundRobin, 4, false);
    let m = h.tournament.matches[0].clone();
    h.submit(m.id, 6, 3).unwrap();

    // stats kept elsewhere were lost
    h.ledger = StatsLedger::new();
    assert_eq!(
        h.submit(m.id, 3, 6).unwrap_err(),
        TournamentError::ReverseNonexistentStats(m.player1)
    );
    let stored = h.tournament.get_match(m.id).unwrap();
    assert_eq!(stored.winner_team, Some(Side::One));
    assert!(h.ledger.stats(m.player3).is_none());
}

#[test]
fn recalculation_agrees_with_incremental_updates() {
    let mut h = Harness::new(TournamentType::Knockout, 4, false);
    let semis = h.round(1, 1);
    h.submit(semis[0].id, 6, 3).unwrap();
    h.submit(semis[1].id, 6, 5).unwrap();
    h.submit(semis[0].id, 5, 6).unwrap();
    for m in h.round(1, 2) {
        h.submit(m.id, 6, 2).unwrap();
    }
    assert!(h.tournament.is_finished());

    for team in h.tournament.teams.clone() {
        for player in team.players() {
            let incremental = h.ledger.stats(player).cloned().unwrap();
            let rebuilt = h.ledger.recalculate(player).unwrap().cloned().unwrap();
            assert_eq!(rebuilt.total_matches, incremental.total_matches);
            assert_eq!(rebuilt.matches_won, incremental.matches_won);
            assert_eq!(rebuilt.games_won, incremental.games_won);
            assert_eq!(rebuilt.games_lost, incremental.games_lost);
            assert_eq!(rebuilt.tournaments_played, 1);
            assert!((rebuilt.tournament_points - incremental.tournament_points).abs() < 1e-9);
        }
    }
}

#[test]
fn create_request_deserializes_and_schedules() {
    let players: Vec<String> = (0..16).map(|_| uuid::Uuid::new_v4().to_string()).collect();
    let json = serde_json::json!({
        "name": "Spring Open",
        "type": "GROUP_STAGE_KNOCKOUT",
        "category": "OPEN_250",
        "allow_ties": true,
        "players": players,
    });
    let request: NewTournament = serde_json::from_value(json).unwrap();
    let t = create_tournament(request).unwrap();
    assert_eq!(t.teams.len(), 8);
    assert_eq!(t.matches.len(), 12);
    assert!(t.matches.iter().all(|m| m.group_number.is_some()));
    assert!(t.allow_ties);
}
