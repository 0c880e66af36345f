//! Integration tests for group stage + knockout: seeding, re-seeding and playoffs.

mod common;

use common::{side_one_wins, Harness};
use doubles_tournament::{
    BracketSlot, ProgressEvent, TieRule, Tier, TournamentError, TournamentStatus, TournamentType,
};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

#[test]
fn single_group_seeds_final_and_third_place() {
    let mut h = Harness::new(TournamentType::GroupStageKnockout, 4, false);
    assert_eq!(h.tournament.max_phases, 2);

    let events = h.play_groups_by_seed();
    assert_eq!(
        events,
        vec![
            ProgressEvent::PhaseComplete { phase: 1 },
            ProgressEvent::RoundGenerated { phase: 2, round: 1 },
        ]
    );
    assert_eq!(h.tournament.current_phase, 2);
    assert_eq!(h.tournament.status, TournamentStatus::Phase1Complete);

    let playoffs = h.round(2, 1);
    assert_eq!(playoffs.len(), 2);
    assert_eq!(playoffs[0].slot, BracketSlot::Final);
    assert_eq!(playoffs[0].match_number, 1);
    assert_eq!(playoffs[0].teams(), (h.team(0), h.team(1)));
    assert_eq!(playoffs[1].slot, BracketSlot::ThirdPlace);
    assert_eq!(playoffs[1].match_number, 2);
    assert_eq!(playoffs[1].teams(), (h.team(2), h.team(3)));

    // the playoff winners take the final places, whatever the group order was
    let final_id = playoffs[0].id;
    h.submit(final_id, 2, 6).unwrap();
    assert_eq!(h.tournament.status, TournamentStatus::InProgress);
    let events = h.submit(playoffs[1].id, 6, 4).unwrap();
    assert_eq!(events, vec![ProgressEvent::Finished]);

    assert_eq!(h.position_of(h.team(1).player1), 1);
    assert_eq!(h.position_of(h.team(0).player1), 2);
    // team 1 won two group matches and the final
    let winner = h.ledger.result(h.tournament.id, h.team(1).player2).unwrap();
    assert_eq!(winner.bonus_points, 3.0);
    assert_eq!(winner.total_points, 10.5);
}

#[test]
fn playoff_ties_are_rejected_even_when_groups_allow_them() {
    let mut h = Harness::new(TournamentType::GroupStageKnockout, 4, true);
    h.play_groups_by_seed();
    let id = h.round(2, 1)[0].id;
    assert_eq!(
        h.submit(id, 5, 5).unwrap_err(),
        TournamentError::TieNotAllowed(TieRule::PlayoffPhase)
    );
}

#[test]
fn two_groups_cross_seed_and_play_placement_finals() {
    let mut h = Harness::new(TournamentType::GroupStageKnockout, 8, false);
    assert_eq!(h.tournament.matches.len(), 12);
    h.play_groups_by_seed();

    let t = h.tournament.teams.clone();
    let semis = h.round(2, 1);
    let pairs: Vec<_> = semis.iter().map(|m| m.teams()).collect();
    assert_eq!(
        pairs,
        vec![(t[0], t[5]), (t[1], t[4]), (t[2], t[7]), (t[6], t[3])]
    );
    assert_eq!(semis[0].slot, BracketSlot::SemiFinal(Tier::Top));
    assert_eq!(semis[3].slot, BracketSlot::SemiFinal(Tier::Middle));

    let events = h.play_round(2, 1, side_one_wins);
    assert_eq!(events, vec![ProgressEvent::RoundGenerated { phase: 2, round: 2 }]);
    let finals = h.round(2, 2);
    let numbers: Vec<u32> = finals.iter().map(|m| m.match_number).collect();
    assert_eq!(numbers, vec![5, 6, 7, 8]);
    assert_eq!(finals[0].teams(), (t[0], t[1]));
    assert_eq!(finals[2].teams(), (t[2], t[6]));

    let events = h.play_round(2, 2, side_one_wins);
    assert_eq!(events, vec![ProgressEvent::Finished]);
    let expected = [(0, 1), (1, 2), (5, 3), (4, 4), (2, 5), (6, 6), (7, 7), (3, 8)];
    for (team, position) in expected {
        assert_eq!(h.position_of(h.team(team).player1), position, "team {}", team);
    }
}

#[test]
fn unplayed_playoffs_are_redrawn_when_group_results_change() {
    let mut h = Harness::new(TournamentType::GroupStageKnockout, 8, false);
    h.play_groups_by_seed();
    let (a1, a2) = (h.team(0), h.team(1));

    // team 1 actually beat team 0, so it tops group A
    let events = h.beat(a2, a1, 6, 4);
    assert_eq!(events, vec![ProgressEvent::RoundRegenerated { phase: 2, round: 1 }]);
    let semis = h.round(2, 1);
    assert_eq!(semis.len(), 4);
    assert_eq!(semis[0].teams(), (a2, h.team(5)));
    assert_eq!(semis[1].teams(), (a1, h.team(4)));
    assert_eq!(h.tournament.status, TournamentStatus::Phase1Complete);

    // once a playoff match is played the draw is frozen
    h.submit(semis[0].id, 6, 0).unwrap();
    let events = h.beat(a1, a2, 6, 4);
    assert!(events.is_empty());
    let frozen = h.round(2, 1);
    assert_eq!(frozen[0].id, semis[0].id);
    assert_eq!(frozen[1].teams(), (a1, h.team(4)));
    assert_eq!(h.tournament.status, TournamentStatus::InProgress);
}

#[test]
fn three_groups_fill_three_brackets() {
    let mut h = Harness::new(TournamentType::GroupStageKnockout, 12, false);
    assert_eq!(h.tournament.matches.len(), 18);
    h.play_groups_by_seed();
    // group A's third only edges its fourth, making it the weakest third
    let t = h.tournament.teams.clone();
    let events = h.beat(t[2], t[3], 6, 5);
    assert_eq!(events, vec![ProgressEvent::RoundRegenerated { phase: 2, round: 1 }]);

    let semis = h.round(2, 1);
    assert_eq!(semis.len(), 6);
    let tiers: Vec<BracketSlot> = semis.iter().map(|m| m.slot).collect();
    assert_eq!(
        tiers,
        vec![
            BracketSlot::SemiFinal(Tier::Top),
            BracketSlot::SemiFinal(Tier::Top),
            BracketSlot::SemiFinal(Tier::Middle),
            BracketSlot::SemiFinal(Tier::Middle),
            BracketSlot::SemiFinal(Tier::Bottom),
            BracketSlot::SemiFinal(Tier::Bottom),
        ]
    );

    let in_tier = |tier: Tier| -> HashSet<_> {
        semis
            .iter()
            .filter(|m| m.slot == BracketSlot::SemiFinal(tier))
            .flat_map(|m| {
                let (a, b) = m.teams();
                [a.key(), b.key()]
            })
            .collect()
    };
    let keys = |ids: [usize; 4]| -> HashSet<_> { ids.iter().map(|i| t[*i].key()).collect() };
    // firsts and the best runner-up; other runners-up and the two best thirds;
    // the weakest third and the fourths
    assert_eq!(in_tier(Tier::Top), keys([0, 4, 8, 1]));
    assert_eq!(in_tier(Tier::Middle), keys([5, 9, 6, 10]));
    assert_eq!(in_tier(Tier::Bottom), keys([2, 3, 7, 11]));

    h.play_round(2, 1, side_one_wins);
    assert_eq!(h.round(2, 2).len(), 6);
    let events = h.play_round(2, 2, side_one_wins);
    assert_eq!(events, vec![ProgressEvent::Finished]);

    let mut positions: Vec<u32> = h
        .tournament
        .teams
        .iter()
        .map(|t| h.position_of(t.player1))
        .collect();
    positions.sort();
    assert_eq!(positions, (1..=12).collect::<Vec<_>>());
}
