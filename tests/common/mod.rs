//! Shared helpers for the integration tests.
#![allow(dead_code)]

use doubles_tournament::{
    generate_schedule, submit_result, Category, Match, MatchId, PlayerId, PointsConfig,
    ProgressEvent, ScoreSubmission, StatsLedger, Team, Tournament, TournamentError,
    TournamentType,
};
use uuid::Uuid;

pub fn teams(n: usize) -> Vec<Team> {
    (0..n).map(|_| Team::new(Uuid::new_v4(), Uuid::new_v4())).collect()
}

/// A tournament, its players' stats and the points tables, driven like the HTTP layer would.
pub struct Harness {
    pub tournament: Tournament,
    pub ledger: StatsLedger,
    pub points: PointsConfig,
}

impl Harness {
    pub fn new(tournament_type: TournamentType, team_count: usize, allow_ties: bool) -> Self {
        let mut tournament = Tournament::new(
            "Test Open",
            tournament_type,
            Category::default(),
            allow_ties,
            teams(team_count),
        );
        tournament.matches = generate_schedule(&tournament).unwrap();
        Self {
            tournament,
            ledger: StatsLedger::new(),
            points: PointsConfig::default(),
        }
    }

    pub fn team(&self, i: usize) -> Team {
        self.tournament.teams[i]
    }

    pub fn submit(
        &mut self,
        match_id: MatchId,
        team1_score: i32,
        team2_score: i32,
    ) -> Result<Vec<ProgressEvent>, TournamentError> {
        submit_result(
            &mut self.tournament,
            &mut self.ledger,
            &self.points,
            match_id,
            ScoreSubmission::new(team1_score, team2_score),
        )
    }

    /// The current match between two teams, in either orientation.
    pub fn match_between(&self, a: Team, b: Team) -> &Match {
        self.tournament
            .matches
            .iter()
            .find(|m| m.teams() == (a, b) || m.teams() == (b, a))
            .expect("no match between these teams")
    }

    /// Record `winner` beating `loser` with the given games, whatever sides they are on.
    pub fn beat(
        &mut self,
        winner: Team,
        loser: Team,
        winner_games: i32,
        loser_games: i32,
    ) -> Vec<ProgressEvent> {
        let m = self.match_between(winner, loser);
        let (id, winner_first) = (m.id, m.team(doubles_tournament::Side::One) == winner);
        let (s1, s2) = if winner_first {
            (winner_games, loser_games)
        } else {
            (loser_games, winner_games)
        };
        self.submit(id, s1, s2).unwrap()
    }

    pub fn round(&self, phase: u8, round: u32) -> Vec<Match> {
        self.tournament
            .round_matches(phase, round)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Play every unplayed match of a round with `score(match)`.
    pub fn play_round<F>(&mut self, phase: u8, round: u32, score: F) -> Vec<ProgressEvent>
    where
        F: Fn(&Match) -> (i32, i32),
    {
        let mut events = Vec::new();
        for m in self.round(phase, round) {
            if !m.is_completed() {
                let (s1, s2) = score(&m);
                events.extend(self.submit(m.id, s1, s2).unwrap());
            }
        }
        events
    }

    /// Play a round robin where the better-seeded team always wins 6-3.
    pub fn play_groups_by_seed(&mut self) -> Vec<ProgressEvent> {
        let seeds = self.tournament.teams.clone();
        let seed = |t: Team| seeds.iter().position(|s| *s == t).unwrap();
        self.play_round(1, 1, |m| {
            let (a, b) = m.teams();
            if seed(a) < seed(b) {
                (6, 3)
            } else {
                (3, 6)
            }
        })
    }

    pub fn position_of(&self, player: PlayerId) -> u32 {
        self.ledger
            .result(self.tournament.id, player)
            .expect("no result for player")
            .position
    }
}

pub fn side_one_wins(_: &Match) -> (i32, i32) {
    (6, 3)
}
