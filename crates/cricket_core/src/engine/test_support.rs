//! Fixtures shared by the engine tests.

use super::ScoringEngine;
use crate::models::{Match, Player, PlayerRole, Team, TeamSide, Toss, TossDecision};

pub(crate) fn team(id: &str, name: &str, size: usize) -> Team {
    let players = (0..size)
        .map(|i| {
            let role = match i {
                0..=4 => PlayerRole::Batsman,
                5 => PlayerRole::WicketKeeper,
                6 | 7 => PlayerRole::AllRounder,
                _ => PlayerRole::Bowler,
            };
            Player::new(format!("{}{}", id, i), format!("{} Player {}", name, i), role)
        })
        .collect();
    Team::new(id, name, players)
}

/// Team "a" bats first. Nothing bowled yet.
pub(crate) fn fresh_match(batting: usize, bowling: usize, overs: u32) -> Match {
    let toss = Toss { winner: TeamSide::Team1, decision: TossDecision::Bat };
    Match::new(team("a", "Alpha", batting), team("b", "Bravo", bowling), overs, toss)
}

/// Live T20 with a0 on strike, a1 at the other end and b0 bowling.
pub(crate) fn live_match() -> Match {
    live_match_with_sizes(11, 11)
}

pub(crate) fn live_match_with_sizes(batting: usize, bowling: usize) -> Match {
    let mut m = fresh_match(batting, bowling, 20);
    ScoringEngine::default()
        .start_match(&mut m, "a0", "a1", "b0")
        .expect("fixture match starts");
    m
}

pub(crate) fn innings1(m: &Match) -> &crate::models::Innings {
    m.innings.first.as_ref().expect("first innings")
}

pub(crate) fn innings2(m: &Match) -> &crate::models::Innings {
    m.innings.second.as_ref().expect("second innings")
}

pub(crate) fn batting(m: &Match, id: &str) -> crate::models::BattingStats {
    m.team1
        .player(id)
        .or_else(|| m.team2.player(id))
        .map(|p| p.batting_stats.clone())
        .expect("known player")
}

pub(crate) fn bowling(m: &Match, id: &str) -> crate::models::BowlingStats {
    m.team1
        .player(id)
        .or_else(|| m.team2.player(id))
        .map(|p| p.bowling_stats.clone())
        .expect("known player")
}
